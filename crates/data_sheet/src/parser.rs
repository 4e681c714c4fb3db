use std::io::BufRead;

use tracing::trace;

use crate::errors::{ParseError, Result};
use crate::template::{is_identifier, BitKind, Template, TEMPLATE_WIDTH};

const COMMENT: char = '#';
const GROUPS: usize = 4;

/// Reads a data sheet line by line, keeping track of the line number and the byte offset of each
/// line so errors can point back into the source.
pub(crate) struct Lines<R> {
    reader: R,
    number: usize,
    offset: usize,
    buffer: String,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            number: 0,
            offset: 0,
            buffer: String::new(),
        }
    }

    /// Advances to the next line. Returns `false` at the end of the input.
    fn next(&mut self) -> Result<bool> {
        self.offset += self.buffer.len();
        self.buffer.clear();

        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(false);
        }

        self.number += 1;
        Ok(true)
    }

    fn current(&self) -> &str {
        self.buffer.trim_end_matches(&['\n', '\r'][..])
    }
}

/// Whitespace separated tokens of a line, with their byte offset in the line.
fn tokens(line: &str) -> Vec<(usize, &str)> {
    let mut result = vec![];
    let mut start = None;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                result.push((s, &line[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        result.push((s, &line[s..]));
    }

    result
}

fn parse_line(line: &str, number: usize, offset: usize) -> Result<Option<Template>> {
    if line.trim_start().starts_with(COMMENT) {
        return Ok(None);
    }

    let tokens = tokens(line);
    if tokens.is_empty() {
        return Ok(None);
    }

    // 0001 11rd dddd rrrr ADC
    if tokens.len() != GROUPS + 1 {
        return Err(ParseError::MalformedLine {
            line: number,
            found: tokens.len(),
            span: offset + tokens[0].0..offset + line.len(),
        });
    }

    let groups = &tokens[..GROUPS];
    let mut pattern = String::with_capacity(TEMPLATE_WIDTH);

    for &(start, group) in groups {
        for (i, c) in group.char_indices() {
            if BitKind::from_char(c).is_none() {
                let at = offset + start + i;
                return Err(ParseError::InvalidCharacter {
                    line: number,
                    ch: c,
                    span: at..at + c.len_utf8(),
                });
            }
            pattern.push(c);
        }
    }

    if pattern.len() != TEMPLATE_WIDTH {
        let (last_start, last) = groups[GROUPS - 1];
        return Err(ParseError::TemplateLength {
            line: number,
            len: pattern.len(),
            template: pattern,
            span: offset + groups[0].0..offset + last_start + last.len(),
        });
    }

    let (start, handler) = tokens[GROUPS];
    if !is_identifier(handler) {
        return Err(ParseError::InvalidHandler {
            line: number,
            name: handler.to_owned(),
            span: offset + start..offset + start + handler.len(),
        });
    }

    Ok(Some(Template::from_parts(
        pattern,
        handler.to_owned(),
        number,
    )))
}

/// Parses every template in the data sheet, in source order. Comment lines (starting with `#`)
/// and blank lines are skipped. The first malformed line aborts the parse.
pub fn parse_templates<R: BufRead>(reader: R) -> Result<Vec<Template>> {
    let mut lines = Lines::new(reader);
    let mut templates = vec![];

    while lines.next()? {
        if let Some(template) = parse_line(lines.current(), lines.number, lines.offset)? {
            trace!("line {}: {}", lines.number, template);
            templates.push(template);
        }
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<Template>> {
        parse_templates(source.as_bytes())
    }

    #[test]
    fn basic() {
        let templates = parse(
            "# Arithmetic\n0001 11rd dddd rrrr ADC\n\n0000 11rd dddd rrrr   ADD\r\n",
        )
        .unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].pattern(), "000111rdddddrrrr");
        assert_eq!(templates[0].handler(), "ADC");
        assert_eq!(templates[0].line(), 2);
        assert_eq!(templates[1].pattern(), "000011rdddddrrrr");
        assert_eq!(templates[1].handler(), "ADD");
        assert_eq!(templates[1].line(), 4);
    }

    #[test]
    fn indented_comment() {
        let templates = parse("   # 0000 0000 0000 0000 NOP\n").unwrap();
        assert!(templates.is_empty());
    }

    #[test]
    fn wrong_length() {
        let source = "0000 0000 0000 0000 NOP\n0001 11rd dddd rrr ADC\n";
        match parse(source) {
            Err(ParseError::TemplateLength {
                line,
                template,
                len,
                span,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(template, "000111rdddddrrr");
                assert_eq!(len, 15);
                assert_eq!(&source[span], "0001 11rd dddd rrr");
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn invalid_character() {
        let source = "0001 11rd dd?d rrrr ADC\n";
        match parse(source) {
            Err(ParseError::InvalidCharacter { line, ch, span }) => {
                assert_eq!(line, 1);
                assert_eq!(ch, '?');
                assert_eq!(span, 12..13);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn missing_handler() {
        let source = "0001 11rd dddd rrrr\n";
        assert!(matches!(
            parse(source),
            Err(ParseError::MalformedLine {
                line: 1,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn invalid_handler() {
        let source = "0001 11rd dddd rrrr 3ADC\n";
        match parse(source) {
            Err(ParseError::InvalidHandler { name, span, .. }) => {
                assert_eq!(name, "3ADC");
                assert_eq!(&source[span], "3ADC");
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn tokens_with_offsets() {
        assert_eq!(
            tokens("  ab cd\tef"),
            vec![(2, "ab"), (5, "cd"), (8, "ef")]
        );
        assert!(tokens("   ").is_empty());
    }
}
