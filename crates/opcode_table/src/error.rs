use data_sheet::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(
        "Templates overlap at {word:#06x}: {first} (line {first_line}) and {second} (line {second_line}) both match it"
    )]
    Overlap {
        word: u16,
        first: String,
        first_line: usize,
        second: String,
        second_line: usize,
    },

    #[error("Option {option} must be an identifier, got \"{value}\"")]
    InvalidOption { option: &'static str, value: String },

    #[error("Could not write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
