use crate::errors::{ParseError, Span};

struct Diagnostic {
    message: String,
    span: Span,
}

/// Collects errors found in a data sheet and prints them with the offending source line.
pub struct Diagnostics<'a> {
    source: &'a str,
    path: String,

    diags: Vec<Diagnostic>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(source: &'a str, path: impl ToString) -> Self {
        Self {
            source,
            path: path.to_string(),
            diags: vec![],
        }
    }

    pub fn error(&mut self, message: impl ToString, span: Span) {
        self.diags.push(Diagnostic {
            message: message.to_string(),
            span,
        });
    }

    /// Records a parse error. Errors without a location in the source (I/O failures) are not
    /// recorded and `false` is returned.
    pub fn parse_error(&mut self, err: &ParseError) -> bool {
        match err.span() {
            Some(span) => {
                self.error(err, span);
                true
            }
            None => false,
        }
    }

    pub fn print<W: std::io::Write>(&self, output: &mut W) -> Result<(), std::io::Error> {
        for diag in &self.diags {
            let message = format!("ERROR: {}", &diag.message);
            self.print_source_line(output, &diag.span, message.as_str())?;
        }

        Ok(())
    }

    fn print_source_line<W: std::io::Write>(
        &self,
        output: &mut W,
        span: &Span,
        message: &str,
    ) -> Result<(), std::io::Error> {
        let start = span.start.min(self.source.len());
        let end = span.end.clamp(start, self.source.len());

        let prev_new_line = match self.source[..start].rfind('\n') {
            Some(found) => found + 1,
            None => 0,
        };

        let next_new_line = match self.source[start..].find('\n') {
            Some(found) => start + found,
            None => self.source.len(),
        };

        let fragment = self.source[prev_new_line..next_new_line].trim_end_matches('\r');

        let line = self.source[0..start].matches('\n').count() + 1;
        let column = start - prev_new_line;

        writeln!(output, "{}:{}:{}: {}", self.path, line, column + 1, message)?;

        writeln!(output, "{}", fragment)?;
        for _ in 0..column {
            write!(output, " ")?;
        }
        let end = if start == end {
            end + 1
        } else {
            end.min(next_new_line)
        };
        for _ in start..end {
            write!(output, "^")?;
        }
        writeln!(output)
    }
}
