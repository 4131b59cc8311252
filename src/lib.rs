// cofi: neighborhood collaborative filtering over implicit feedback
//
// This is the library root. The pipeline runs data -> similarity ->
// recommend -> evaluate; output and config serve the CLI in main.rs.

pub mod config;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod output;
pub mod recommend;
pub mod similarity;

pub use error::{CofiError, Result};
