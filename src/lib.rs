pub mod assign;
pub mod committee;
pub mod config;
pub mod date;
pub mod error;
pub mod history;
pub mod logging;
pub mod scoring;

pub use error::{Error, Result, SchedulingError, ValidationError};
