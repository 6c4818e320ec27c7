//! SQLite implementations of the storage interfaces

mod meanings;
mod words;

pub use meanings::SqliteMeaningRegistry;
pub use words::SqliteWordCatalog;
