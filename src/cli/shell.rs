//! Interactive two-letter command shell.
//!
//! Each command reads its own arguments from the input stream, calls into the
//! [`Session`], and prints a one-line confirmation. Errors are printed rather
//! than returned; when an error asks for it, the rest of the input line is
//! discarded first so stray arguments are not read as the next command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::codec::Scanner;
use crate::config::{data_path, DEFAULT_PROMPT};
use crate::error::MediaError;
use crate::library::{normalize_title, CollectionStats, RecordId, RecordList, LIBRARY_EMPTY};
use crate::session::Session;

/// Why a single command did not complete
#[derive(Debug, Error)]
enum CommandError {
    /// Reported to the user; the shell keeps running
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Terminal input or output failed; the shell stops
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

type CommandResult<T = ()> = Result<T, CommandError>;

pub struct Shell<R, W> {
    input: Scanner<R>,
    out: W,
    session: Session,
    prompt: String,
    data_dir: PathBuf,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input: Scanner::new(input),
            out,
            session: Session::new(),
            prompt: DEFAULT_PROMPT.to_string(),
            data_dir: PathBuf::from("."),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Directory that relative `sA`/`rA` file names are resolved against
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run until `qq` or end of input, then clear all data
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "\n{}", self.prompt)?;
            self.out.flush()?;

            let command = match self.input.read_command()? {
                Some(command) if command != "qq" => command,
                _ => break,
            };

            match self.dispatch(&command) {
                Ok(()) => {}
                Err(CommandError::Media(err)) => {
                    debug!(command = %command, error = %err, "Command rejected");
                    if err.discards_line() {
                        self.input.read_line()?;
                    }
                    writeln!(self.out, "{}", err)?;
                }
                Err(CommandError::Io(err)) => return Err(err.into()),
            }
        }

        self.clear_all()?;
        writeln!(self.out, "Done")?;
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: &str) -> CommandResult {
        match command {
            "fr" => self.find_record(),
            "pr" => self.print_record(),
            "pc" => self.print_collection(),
            "pL" => self.print_library(),
            "pC" => self.print_catalog(),
            "pa" => self.print_allocations(),
            "ar" => self.add_record(),
            "ac" => self.add_collection(),
            "am" => self.add_member(),
            "mr" => self.modify_rating(),
            "mt" => self.modify_title(),
            "dr" => self.delete_record(),
            "dc" => self.delete_collection(),
            "dm" => self.delete_member(),
            "cL" => self.clear_library(),
            "cC" => self.clear_catalog(),
            "cA" => self.clear_all(),
            "sA" => self.save_all(),
            "rA" => self.restore_all(),
            "fs" => self.find_string(),
            "lr" => self.list_ratings(),
            "cs" => self.collection_statistics(),
            "cc" => self.combine_collections(),
            _ => {
                self.input.read_line()?;
                writeln!(self.out, "Unrecognized command!")?;
                Ok(())
            }
        }
    }

    // Argument readers

    fn read_word(&mut self) -> CommandResult<String> {
        Ok(self.input.read_word()?)
    }

    fn read_int(&mut self) -> CommandResult<i64> {
        Ok(self
            .input
            .read_int()?
            .ok_or(MediaError::UnreadableInteger)?)
    }

    /// Read an id and make sure it names an existing record
    fn read_record_id(&mut self) -> CommandResult<RecordId> {
        let id = RecordId::try_from(self.read_int()?).map_err(|_| MediaError::NoRecordWithId)?;
        self.session.library().find_record_by_id(id)?;
        Ok(id)
    }

    /// Read a name and make sure it names an existing collection
    fn read_collection_name(&mut self) -> CommandResult<String> {
        let name = self.read_word()?;
        self.session.catalog().find_collection(&name)?;
        Ok(name)
    }

    fn read_title(&mut self) -> CommandResult<String> {
        let line = self.input.read_line()?;
        Ok(normalize_title(&line).ok_or(MediaError::UnreadableTitle)?)
    }

    // Commands

    fn find_record(&mut self) -> CommandResult {
        let title = self.read_title()?;
        let record = self.session.library().find_record_by_title(&title)?;
        writeln!(self.out, "{}", record)?;
        Ok(())
    }

    fn print_record(&mut self) -> CommandResult {
        let id = self.read_record_id()?;
        let record = self.session.library().find_record_by_id(id)?;
        writeln!(self.out, "{}", record)?;
        Ok(())
    }

    fn print_collection(&mut self) -> CommandResult {
        let name = self.read_collection_name()?;
        let collection = self.session.catalog().find_collection(&name)?;
        writeln!(self.out, "{}", collection.display(self.session.library()))?;
        Ok(())
    }

    fn print_library(&mut self) -> CommandResult {
        writeln!(self.out, "{}", self.session.library())?;
        Ok(())
    }

    fn print_catalog(&mut self) -> CommandResult {
        let catalog = self.session.catalog();
        writeln!(self.out, "{}", catalog.display(self.session.library()))?;
        Ok(())
    }

    fn print_allocations(&mut self) -> CommandResult {
        let allocations = self.session.allocations();
        writeln!(self.out, "Memory allocations:")?;
        writeln!(self.out, "Records: {}", allocations.records)?;
        writeln!(self.out, "Collections: {}", allocations.collections)?;
        Ok(())
    }

    fn add_record(&mut self) -> CommandResult {
        let medium = self.read_word()?;
        let title = self.read_title()?;
        let id = self.session.add_record(&medium, &title)?;
        writeln!(self.out, "Record {} added", id)?;
        Ok(())
    }

    fn add_collection(&mut self) -> CommandResult {
        let name = self.read_word()?;
        self.session.add_collection(&name)?;
        writeln!(self.out, "Collection {} added", name)?;
        Ok(())
    }

    fn add_member(&mut self) -> CommandResult {
        let name = self.read_collection_name()?;
        let id = self.read_record_id()?;
        let record = self.session.add_member(&name, id)?;
        writeln!(self.out, "Member {} {} added", record.id(), record.title())?;
        Ok(())
    }

    fn modify_rating(&mut self) -> CommandResult {
        let id = self.read_record_id()?;
        let rating = self.read_int()?;
        self.session.set_rating(id, rating)?;
        writeln!(self.out, "Rating for record {} changed to {}", id, rating)?;
        Ok(())
    }

    fn modify_title(&mut self) -> CommandResult {
        let id = self.read_record_id()?;
        let title = self.read_title()?;
        self.session.modify_title(id, &title)?;
        writeln!(self.out, "Title for record {} changed to {}", id, title)?;
        Ok(())
    }

    fn delete_record(&mut self) -> CommandResult {
        let title = self.read_title()?;
        let record = self.session.delete_record(&title)?;
        writeln!(self.out, "Record {} {} deleted", record.id(), record.title())?;
        Ok(())
    }

    fn delete_collection(&mut self) -> CommandResult {
        let name = self.read_word()?;
        self.session.delete_collection(&name)?;
        writeln!(self.out, "Collection {} deleted", name)?;
        Ok(())
    }

    fn delete_member(&mut self) -> CommandResult {
        let name = self.read_collection_name()?;
        let id = self.read_record_id()?;
        let record = self.session.delete_member(&name, id)?;
        writeln!(self.out, "Member {} {} deleted", record.id(), record.title())?;
        Ok(())
    }

    fn clear_library(&mut self) -> CommandResult {
        self.session.clear_library()?;
        writeln!(self.out, "All records deleted")?;
        Ok(())
    }

    fn clear_catalog(&mut self) -> CommandResult {
        self.session.clear_catalog();
        writeln!(self.out, "All collections deleted")?;
        Ok(())
    }

    fn clear_all(&mut self) -> CommandResult {
        self.session.clear_all();
        writeln!(self.out, "All data deleted")?;
        Ok(())
    }

    fn save_all(&mut self) -> CommandResult {
        let file_name = self.read_word()?;
        let path = data_path(&self.data_dir, &file_name);
        self.session.save_all(&path)?;
        writeln!(self.out, "Data saved")?;
        Ok(())
    }

    fn restore_all(&mut self) -> CommandResult {
        let file_name = self.read_word()?;
        let path = data_path(&self.data_dir, &file_name);
        self.session.restore_all(&path)?;
        writeln!(self.out, "Data loaded")?;
        Ok(())
    }

    fn find_string(&mut self) -> CommandResult {
        let needle = self.read_word()?;
        let matches = self.session.library().find_string(&needle)?;
        writeln!(self.out, "{}", RecordList(&matches))?;
        Ok(())
    }

    fn list_ratings(&mut self) -> CommandResult {
        let records = self.session.library().list_ratings();
        if records.is_empty() {
            writeln!(self.out, "{}", LIBRARY_EMPTY)?;
        } else {
            writeln!(self.out, "{}", RecordList(&records))?;
        }
        Ok(())
    }

    fn collection_statistics(&mut self) -> CommandResult {
        let stats = self.session.statistics();
        let num_records = self.session.library().num_records();
        write_statistics(&mut self.out, &stats, num_records)?;
        Ok(())
    }

    fn combine_collections(&mut self) -> CommandResult {
        let first = self.read_collection_name()?;
        let second = self.read_collection_name()?;
        let dst = self.read_word()?;
        self.session.combine_collections(&first, &second, &dst)?;
        writeln!(
            self.out,
            "Collections {} and {} combined into new collection {}",
            first, second, dst
        )?;
        Ok(())
    }
}

/// Print the three collection statistics lines
pub fn write_statistics<W: Write>(
    out: &mut W,
    stats: &CollectionStats,
    num_records: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "{} out of {} Records appear in at least one Collection",
        stats.in_at_least_one, num_records
    )?;
    writeln!(
        out,
        "{} out of {} Records appear in more than one Collection",
        stats.in_more_than_one, num_records
    )?;
    writeln!(
        out,
        "Collections contain a total of {} Records",
        stats.total_memberships
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Run a script and return everything printed, minus prompts
    fn run_script(script: &str) -> String {
        let mut out = Vec::new();
        {
            let mut shell = Shell::new(Cursor::new(script), &mut out).with_prompt("");
            shell.run().unwrap();
        }
        String::from_utf8(out).unwrap().replace("\n\n", "\n")
    }

    #[test]
    fn test_unrecognized_command_discards_line() {
        let output = run_script("zz ar DVD Heat\npL\nqq\n");
        assert!(output.contains("Unrecognized command!"));
        assert!(output.contains("Library is empty"));
        assert!(!output.contains("Record 1 added"));
    }

    #[test]
    fn test_end_of_input_finishes_like_quit() {
        let output = run_script("ar DVD Heat\n");
        assert!(output.contains("Record 1 added"));
        assert!(output.ends_with("All data deleted\nDone\n"));
    }

    #[test]
    fn test_bad_integer_discards_rest_of_line() {
        let output = run_script("pr abc ar\npa\nqq\n");
        assert!(output.contains("Could not read an integer value!"));
        assert!(output.contains("Records: 0"));
        assert!(!output.contains("Unrecognized command!"));
    }

    #[test]
    fn test_missing_title_keeps_line() {
        let output = run_script("fr\npL\nqq\n");
        assert!(output.contains("Could not read a title!"));
        assert!(output.contains("Library is empty"));
    }

    #[test]
    fn test_statistics_lines() {
        let mut out = Vec::new();
        let stats = CollectionStats {
            in_at_least_one: 2,
            in_more_than_one: 1,
            total_memberships: 3,
        };
        write_statistics(&mut out, &stats, 4).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 out of 4 Records appear in at least one Collection\n\
             1 out of 4 Records appear in more than one Collection\n\
             Collections contain a total of 3 Records\n"
        );
    }
}
