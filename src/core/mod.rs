pub mod config;
pub mod errors;
pub mod models;
pub mod tasks;

pub use config::ClientConfig;
pub use errors::LexitrackError;
pub use models::{ Difficulty, MasteryStatus, VocabularyList, Word, WordProgress };
