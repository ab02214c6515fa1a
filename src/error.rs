//! Crate error type
//!
//! Hitting a wall is gameplay, not an error. These cover the cases where a
//! maze cannot be built or the settings cannot be used.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("maze of size {size} has {available} free cells, needs {required}")]
    MazeTooSmall {
        size: usize,
        required: usize,
        available: usize,
    },

    #[error("maze of size {size} exceeds the maximum of {max}")]
    MazeTooLarge { size: usize, max: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings file error: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
