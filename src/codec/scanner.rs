//! Character-level tokenizer over a buffered reader.
//!
//! Lines are pulled from the reader on demand, so the same scanner serves
//! both an interactive terminal and a save file. Whitespace skipping crosses
//! line boundaries; `read_line` consumes up to and including the next newline.

use std::io::{self, BufRead};

pub struct Scanner<R> {
    reader: R,
    line: Vec<char>,
    pos: usize,
    eof: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Make sure at least one unread character is buffered.
    ///
    /// Returns false at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        if self.pos < self.line.len() {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }

        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            self.eof = true;
            self.line.clear();
            self.pos = 0;
            return Ok(false);
        }

        self.line = buf.chars().collect();
        self.pos = 0;
        Ok(true)
    }

    fn peek(&mut self) -> io::Result<Option<char>> {
        if self.fill()? {
            Ok(Some(self.line[self.pos]))
        } else {
            Ok(None)
        }
    }

    pub fn skip_whitespace(&mut self) -> io::Result<()> {
        while let Some(c) = self.peek()? {
            if !c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Next whitespace-delimited token, or an empty string at end of input
    pub fn read_word(&mut self) -> io::Result<String> {
        self.skip_whitespace()?;

        let mut word = String::new();
        while let Some(c) = self.peek()? {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        Ok(word)
    }

    /// Optionally signed decimal integer.
    ///
    /// `Ok(None)` means the next token is not an integer (or input ended);
    /// only the leading sign and digits are consumed.
    pub fn read_int(&mut self) -> io::Result<Option<i64>> {
        self.skip_whitespace()?;

        let mut digits = String::new();
        match self.peek()? {
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() => {
                digits.push(c);
                self.pos += 1;
            }
            _ => return Ok(None),
        }

        while let Some(c) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.pos += 1;
        }

        Ok(digits.parse().ok())
    }

    /// Remainder of the current line without its newline
    pub fn read_line(&mut self) -> io::Result<String> {
        if !self.fill()? {
            return Ok(String::new());
        }

        let rest = &self.line[self.pos..];
        let (text, consumed) = match rest.iter().position(|&c| c == '\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        let text: String = text.iter().collect();

        self.pos += consumed;
        Ok(text)
    }

    /// Two non-whitespace characters, each optionally preceded by whitespace
    pub fn read_command(&mut self) -> io::Result<Option<String>> {
        let mut command = String::with_capacity(2);

        for _ in 0..2 {
            self.skip_whitespace()?;
            match self.peek()? {
                Some(c) => {
                    command.push(c);
                    self.pos += 1;
                }
                None => return Ok(None),
            }
        }

        Ok(Some(command))
    }
}
