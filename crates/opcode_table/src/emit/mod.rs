//! Serializes the dispatch table and the operand extractions as source code for the emulator that
//! consumes them.

mod c;
mod rust;

use std::io::Write;

use data_sheet::is_identifier;
use serde::Deserialize;

pub use c::CEmitter;
pub use rust::RustEmitter;

use crate::error::{Error, Result};
use crate::shape::ShapeLayout;
use crate::table::DispatchTable;

/// Names used in the generated code.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Handler for words no template claims.
    pub default_handler: String,
    /// Prepended to every handler name.
    pub handler_prefix: String,
    pub table_name: String,
    pub handler_type: String,
    /// Name of the instruction word in extraction expressions.
    pub word_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_handler: "BREAK".to_owned(),
            handler_prefix: "do_".to_owned(),
            table_name: "INSTR".to_owned(),
            handler_type: "Handler".to_owned(),
            word_name: "instr".to_owned(),
        }
    }
}

impl Options {
    /// Every name ends up as a symbol in the generated code. The prefix is glued to handler names
    /// so it may also be empty.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("default_handler", &self.default_handler),
            ("table_name", &self.table_name),
            ("handler_type", &self.handler_type),
            ("word_name", &self.word_name),
        ];

        for (option, value) in names {
            if !is_identifier(value) {
                return Err(Error::InvalidOption {
                    option,
                    value: value.clone(),
                });
            }
        }

        if !self.handler_prefix.is_empty() && !is_identifier(&self.handler_prefix) {
            return Err(Error::InvalidOption {
                option: "handler_prefix",
                value: self.handler_prefix.clone(),
            });
        }

        Ok(())
    }
}

pub trait Emitter {
    fn write_table(&self, out: &mut dyn Write, table: &DispatchTable) -> std::io::Result<()>;

    fn write_fields(&self, out: &mut dyn Write, layouts: &[ShapeLayout])
        -> std::io::Result<()>;
}

/// Writes one comment block per shape: the shape itself, followed by a declaration per operand.
/// `declare` renders the declaration for an operand letter and its expression.
pub(crate) fn write_field_comments(
    out: &mut dyn Write,
    layouts: &[ShapeLayout],
    word_name: &str,
    declare: impl Fn(char, String) -> String,
) -> std::io::Result<()> {
    for layout in layouts {
        writeln!(out, "// {}", layout.shape)?;
        for field in &layout.fields {
            let expression = field.expression(word_name).to_string();
            writeln!(out, "// {}", declare(field.letter, expression))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_toml() {
        let options: Options = toml::from_str(
            r#"
            default_handler = "ILLEGAL"
            handler_prefix = "op_"
            "#,
        )
        .unwrap();

        assert_eq!(options.default_handler, "ILLEGAL");
        assert_eq!(options.handler_prefix, "op_");
        assert_eq!(options.table_name, "INSTR");
        assert_eq!(options.word_name, "instr");
    }

    #[test]
    fn default_options_are_valid() {
        assert!(Options::default().validate().is_ok());

        let options = Options {
            handler_prefix: String::new(),
            ..Options::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn names_must_be_identifiers() {
        let options = Options {
            default_handler: "3 bad;".to_owned(),
            ..Options::default()
        };
        match options.validate() {
            Err(err @ Error::InvalidOption { .. }) => assert_eq!(
                err.to_string(),
                "Option default_handler must be an identifier, got \"3 bad;\""
            ),
            r => panic!("unexpected result: {:?}", r),
        }

        let options = Options {
            handler_prefix: "1_".to_owned(),
            ..Options::default()
        };
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOption {
                option: "handler_prefix",
                ..
            })
        ));

        let options = Options {
            table_name: "INSTR[]".to_owned(),
            ..Options::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn unknown_option() {
        assert!(toml::from_str::<Options>("table = \"X\"").is_err());
    }
}
