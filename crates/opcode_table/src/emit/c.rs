use std::io::Write;

use super::{write_field_comments, Emitter, Options};
use crate::shape::ShapeLayout;
use crate::table::{DispatchTable, TABLE_SIZE};

/// Emits a C array of handler function pointers, to be `#include`d by a C emulator core.
pub struct CEmitter<'a> {
    options: &'a Options,
}

impl<'a> CEmitter<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl Emitter for CEmitter<'_> {
    fn write_table(&self, out: &mut dyn Write, table: &DispatchTable) -> std::io::Result<()> {
        writeln!(
            out,
            "{} {}[{:#x}] = {{",
            self.options.handler_type, self.options.table_name, TABLE_SIZE
        )?;

        for (_, handler) in table.iter() {
            writeln!(out, "  {}{},", self.options.handler_prefix, handler)?;
        }

        writeln!(out, "}};")
    }

    fn write_fields(
        &self,
        out: &mut dyn Write,
        layouts: &[ShapeLayout],
    ) -> std::io::Result<()> {
        write_field_comments(out, layouts, &self.options.word_name, |letter, expression| {
            format!("u16 {} = {};", letter, expression)
        })
    }
}

#[cfg(test)]
mod tests {
    use data_sheet::Template;

    use super::*;
    use crate::shape::layouts;

    #[test]
    fn include_file() {
        let templates = [Template::new("10q0qq0ddddd1qqq", "LD_Y4").unwrap()];
        let table = DispatchTable::build(&templates, "BREAK").unwrap();
        let options = Options {
            table_name: "Instr".to_owned(),
            ..Options::default()
        };
        let emitter = CEmitter::new(&options);

        let mut out = Vec::new();
        emitter.write_table(&mut out, &table).unwrap();
        emitter.write_fields(&mut out, &layouts(&templates)).unwrap();
        let out = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Handler Instr[0x10000] = {");
        assert_eq!(lines[1], "  do_BREAK,");
        assert_eq!(lines[1 + 0x8008], "  do_LD_Y4,");
        assert_eq!(lines[1 + TABLE_SIZE], "};");
        assert_eq!(
            &lines[2 + TABLE_SIZE..],
            &[
                "// --q-qq-ddddd-qqq",
                "// u16 q = (instr & 0x7) | ((instr >> 7) & 0x18) | ((instr >> 8) & 0x20);",
                "// u16 d = ((instr >> 4) & 0x1f);",
            ]
        );
    }
}
