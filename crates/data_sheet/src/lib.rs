//! Reads instruction data sheets: text files where every line describes one 16-bit opcode
//! template and the handler that executes it.
//!
//! ```text
//! # comment
//! 0001 11rd dddd rrrr ADC
//! ```

mod diagnostics;
mod errors;
mod parser;
mod template;

pub use diagnostics::Diagnostics;
pub use errors::{ParseError, Result, Span};
pub use parser::parse_templates;
pub use template::{bit_index, is_identifier, BitKind, Template, TEMPLATE_WIDTH};

/// Source of the bundled AVR data sheet.
pub const AVR_DATA_SHEET: &str = include_str!("../data_sheet.txt");

/// Parses the bundled AVR data sheet.
pub fn get_data_sheet() -> Result<Vec<Template>> {
    parse_templates(AVR_DATA_SHEET.as_bytes())
}
