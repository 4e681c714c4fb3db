use std::io::Write;

use super::{write_field_comments, Emitter, Options};
use crate::shape::ShapeLayout;
use crate::table::{DispatchTable, TABLE_SIZE};

const ABOVE: &str = "// This file is generated by mkinst. DO NOT MODIFY.

#[rustfmt::skip]
";

const BELOW: &str = "];
";

/// Emits a `static` array of handler functions for a Rust emulator.
pub struct RustEmitter<'a> {
    options: &'a Options,
}

impl<'a> RustEmitter<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl Emitter for RustEmitter<'_> {
    fn write_table(&self, out: &mut dyn Write, table: &DispatchTable) -> std::io::Result<()> {
        out.write_all(ABOVE.as_bytes())?;
        writeln!(
            out,
            "pub static {}: [{}; {:#x}] = [",
            self.options.table_name, self.options.handler_type, TABLE_SIZE
        )?;

        for (_, handler) in table.iter() {
            writeln!(out, "    {}{},", self.options.handler_prefix, handler)?;
        }

        out.write_all(BELOW.as_bytes())
    }

    fn write_fields(
        &self,
        out: &mut dyn Write,
        layouts: &[ShapeLayout],
    ) -> std::io::Result<()> {
        write_field_comments(out, layouts, &self.options.word_name, |letter, expression| {
            format!("let {} = {};", letter, expression)
        })
    }
}
