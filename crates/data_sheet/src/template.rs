use std::fmt::{Display, Formatter};

/// Number of characters in a template, one per bit of the instruction word.
pub const TEMPLATE_WIDTH: usize = 16;

/// Maps a character position in a template (0 is the leftmost character) to the bit it describes
/// in the instruction word. Templates are written MSB-first, so position 0 is bit 15 and position
/// 15 is bit 0.
#[inline]
pub const fn bit_index(position: usize) -> u32 {
    assert!(position < TEMPLATE_WIDTH);
    (TEMPLATE_WIDTH - 1 - position) as u32
}

/// Whether `s` can be used as a symbol in generated code: an ASCII letter or `_` followed by
/// ASCII letters, digits and `_`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// What a single template character says about its bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BitKind {
    Zero,
    One,
    Operand(char),
}

impl BitKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(BitKind::Zero),
            '1' => Some(BitKind::One),
            c if c.is_ascii_alphabetic() => Some(BitKind::Operand(c)),
            _ => None,
        }
    }
}

/// A single line of the data sheet: a 16 character bit template and the name of the handler that
/// executes every instruction word it matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    pattern: String,
    handler: String,
    line: usize,
}

impl Template {
    /// Creates a template without going through the data sheet parser. Returns `None` if the
    /// pattern is not 16 characters from the template alphabet or the handler is not an
    /// identifier.
    pub fn new(pattern: &str, handler: &str) -> Option<Self> {
        if pattern.chars().count() != TEMPLATE_WIDTH
            || pattern.chars().any(|c| BitKind::from_char(c).is_none())
            || !is_identifier(handler)
        {
            return None;
        }

        Some(Self {
            pattern: pattern.to_owned(),
            handler: handler.to_owned(),
            line: 0,
        })
    }

    pub(crate) fn from_parts(pattern: String, handler: String, line: usize) -> Self {
        Self {
            pattern,
            handler,
            line,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The 1-based line in the data sheet, or 0 for templates built in code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Every character of the template paired with the bit it describes.
    pub fn bits(&self) -> impl Iterator<Item = (u32, BitKind)> + '_ {
        self.pattern.chars().enumerate().map(|(position, c)| {
            // Validated on construction.
            let kind = BitKind::from_char(c).unwrap_or(BitKind::Zero);
            (bit_index(position), kind)
        })
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let p = &self.pattern;
        write!(
            f,
            "{} {} {} {} {}",
            &p[0..4],
            &p[4..8],
            &p[8..12],
            &p[12..16],
            self.handler
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_index_is_msb_first() {
        assert_eq!(bit_index(0), 15);
        assert_eq!(bit_index(5), 10);
        assert_eq!(bit_index(15), 0);
    }

    #[test]
    fn bits_follow_positions() {
        let template = Template::new("1000000000000rrr", "X").unwrap();
        let bits: Vec<_> = template.bits().collect();

        assert_eq!(bits[0], (15, BitKind::One));
        assert_eq!(bits[1], (14, BitKind::Zero));
        assert_eq!(bits[15], (0, BitKind::Operand('r')));
    }

    #[test]
    fn new_rejects_bad_patterns() {
        assert!(Template::new("000111rdddddrrr", "ADC").is_none());
        assert!(Template::new("000111rdddddrrr?", "ADC").is_none());
        assert!(Template::new("000111rdddddrrrr", "ADC").is_some());
    }

    #[test]
    fn new_rejects_bad_handlers() {
        assert!(Template::new("000111rdddddrrrr", "3ADC").is_none());
        assert!(Template::new("000111rdddddrrrr", "do ADC;").is_none());
        assert!(Template::new("000111rdddddrrrr", "").is_none());
        assert!(Template::new("000111rdddddrrrr", "_ld_y4").is_some());
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("LD_Y4"));
        assert!(is_identifier("_"));
        assert!(!is_identifier("4LD"));
        assert!(!is_identifier("LD-Y"));
        assert!(!is_identifier("ADC;"));
    }

    #[test]
    fn display_groups_by_nibble() {
        let template = Template::new("000111rdddddrrrr", "ADC").unwrap();
        assert_eq!(template.to_string(), "0001 11rd dddd rrrr ADC");
    }
}
