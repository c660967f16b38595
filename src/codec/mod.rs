//! Text persistence for the library and catalog.

pub mod format;
pub mod scanner;

pub use format::{restore, restore_catalog, restore_library, save, save_catalog, save_library};
pub use scanner::Scanner;
