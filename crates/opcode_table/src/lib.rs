//! Compiles a data sheet of 16-bit instruction templates into a dispatch table covering every
//! possible instruction word, and into code that extracts each operand from an instruction word.

pub mod emit;
mod error;
mod masks;
mod segment;
mod shape;
mod spread;
mod table;

use std::io::BufRead;

use data_sheet::Template;

pub use emit::{CEmitter, Emitter, Options, RustEmitter};
pub use error::{Error, Result};
pub use masks::BitMasks;
pub use segment::{pieces, Expression, Field, Run, Segment};
pub use shape::{layouts, Shape, ShapeLayout, PLACEHOLDER};
pub use spread::{gather, spread, Extension};
pub use table::{DispatchTable, HandlerId, TableBuilder, TABLE_SIZE};

/// Everything generated from one data sheet.
pub struct Generated {
    pub table: DispatchTable,
    pub layouts: Vec<ShapeLayout>,
}

/// The rendered output, held in memory until everything rendered successfully.
#[derive(Debug, Default)]
pub struct Artifacts {
    pub table: Vec<u8>,
    pub fields: Vec<u8>,
}

impl Generated {
    pub fn render(&self, emitter: &dyn Emitter) -> Result<Artifacts> {
        let mut artifacts = Artifacts::default();
        emitter.write_table(&mut artifacts.table, &self.table)?;
        emitter.write_fields(&mut artifacts.fields, &self.layouts)?;
        Ok(artifacts)
    }
}

pub fn generate(templates: &[Template], options: &Options) -> Result<Generated> {
    options.validate()?;

    let table = DispatchTable::build(templates, &options.default_handler)?;
    let layouts = layouts(templates);

    Ok(Generated { table, layouts })
}

/// Parses a data sheet from `reader` and generates from it.
pub fn generate_from<R: BufRead>(reader: R, options: &Options) -> Result<Generated> {
    let templates = data_sheet::parse_templates(reader)?;
    generate(&templates, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_output() {
        let options = Options::default();
        let emitter = RustEmitter::new(&options);

        let first = generate_from(data_sheet::AVR_DATA_SHEET.as_bytes(), &options)
            .unwrap()
            .render(&emitter)
            .unwrap();
        let second = generate_from(data_sheet::AVR_DATA_SHEET.as_bytes(), &options)
            .unwrap()
            .render(&emitter)
            .unwrap();

        assert_eq!(first.table, second.table);
        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn parse_errors_abort() {
        let source = "0001 11rd dddd rrrr ADC\n0001 11rd dddd rrrr\n";
        assert!(matches!(
            generate_from(source.as_bytes(), &Options::default()),
            Err(Error::Parse(data_sheet::ParseError::MalformedLine { line: 2, .. }))
        ));
    }

    #[test]
    fn overlap_reports_lines() {
        let source = "# two encodings of the same word\n1001 0101 1001 1000 BREAK\n1001 0101 1001 100x HALT\n";

        match generate_from(source.as_bytes(), &Options::default()) {
            Err(err @ Error::Overlap { .. }) => assert_eq!(
                err.to_string(),
                "Templates overlap at 0x9598: BREAK (line 2) and HALT (line 3) both match it"
            ),
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("overlap not detected"),
        }
    }

    #[test]
    fn default_handler_option() {
        let options = Options {
            default_handler: "ILLEGAL".to_owned(),
            ..Options::default()
        };
        let generated = generate(&data_sheet::get_data_sheet().unwrap(), &options).unwrap();

        assert_eq!(generated.table.get(0x9003), "ILLEGAL");
        assert_eq!(generated.table.get(0x9598), "BREAK");
        assert_eq!(generated.layouts.len(), 20);
    }

    #[test]
    fn invalid_default_handler() {
        let options = Options {
            default_handler: "3 bad;".to_owned(),
            ..Options::default()
        };

        assert!(matches!(
            generate_from(data_sheet::AVR_DATA_SHEET.as_bytes(), &options),
            Err(Error::InvalidOption {
                option: "default_handler",
                ..
            })
        ));
    }
}
