use std::fmt::{Display, Formatter};

/// A maximal run of consecutive set bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Run {
    pub start: u32,
    pub len: u32,
}

/// Splits `occupied` into runs of consecutive set bits, from bit 0 upwards.
pub fn pieces(occupied: u16) -> Vec<Run> {
    let mut runs = vec![];
    let mut bit = 0;

    while bit < u16::BITS {
        if occupied & (1 << bit) == 0 {
            bit += 1;
            continue;
        }

        let start = bit;
        while bit < u16::BITS && occupied & (1 << bit) != 0 {
            bit += 1;
        }
        runs.push(Run {
            start,
            len: bit - start,
        });
    }

    runs
}

/// One run of an operand's bits inside the instruction word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Segment {
    /// Lowest bit of the run in the instruction word.
    pub bit: u32,
    pub len: u32,
    /// Where the run lands in the operand value.
    pub offset: u32,
}

impl Segment {
    /// How far the word is shifted right to line the run up with its place in the operand.
    #[inline]
    pub fn shift(&self) -> u32 {
        self.bit - self.offset
    }

    /// The run's bits in the operand value.
    #[inline]
    pub fn mask(&self) -> u16 {
        (((1u32 << self.len) - 1) << self.offset) as u16
    }

    #[inline]
    pub fn extract(&self, word: u16) -> u16 {
        (word >> self.shift()) & self.mask()
    }
}

/// An operand and the runs of the instruction word it is stored in. The lowest run holds the
/// least significant bits of the operand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub letter: char,
    pub segments: Vec<Segment>,
}

impl Field {
    pub fn new(letter: char, occupied: u16) -> Self {
        let mut offset = 0;
        let segments = pieces(occupied)
            .into_iter()
            .map(|run| {
                let segment = Segment {
                    bit: run.start,
                    len: run.len,
                    offset,
                };
                offset += run.len;
                segment
            })
            .collect();

        Self { letter, segments }
    }

    /// Number of bits in the operand.
    pub fn width(&self) -> u32 {
        self.segments.iter().map(|s| s.len).sum()
    }

    /// Reconstructs the operand value from an instruction word.
    pub fn extract(&self, word: u16) -> u16 {
        self.segments
            .iter()
            .fold(0, |value, segment| value | segment.extract(word))
    }

    /// The extraction as source code, reading the instruction from a variable called `word`.
    pub fn expression<'a>(&'a self, word: &'a str) -> Expression<'a> {
        Expression { field: self, word }
    }
}

pub struct Expression<'a> {
    field: &'a Field,
    word: &'a str,
}

impl Display for Expression<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.field.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }

            match segment.shift() {
                0 => write!(f, "({} & {:#x})", self.word, segment.mask())?,
                shift => write!(f, "(({} >> {}) & {:#x})", self.word, shift, segment.mask())?,
            }
        }

        Ok(())
    }
}
