use data_sheet::{BitKind, Template};

use crate::spread::Extension;

/// The fixed and variable bits of a template.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BitMasks {
    /// Bits that must be 1.
    pub fixed1: u16,
    /// Bits that may take any value.
    pub variable: u16,
}

impl BitMasks {
    pub fn from_template(template: &Template) -> Self {
        template
            .bits()
            .fold(Self::default(), |masks, (bit, kind)| match kind {
                BitKind::Zero => masks,
                BitKind::One => Self {
                    fixed1: masks.fixed1 | 1 << bit,
                    ..masks
                },
                BitKind::Operand(_) => Self {
                    variable: masks.variable | 1 << bit,
                    ..masks
                },
            })
    }

    /// Bits that must be 0.
    #[inline]
    pub fn fixed0(&self) -> u16 {
        !(self.fixed1 | self.variable)
    }

    /// Number of variable bits.
    #[inline]
    pub fn width(&self) -> u32 {
        self.variable.count_ones()
    }

    /// Does `word` belong to the template?
    #[inline]
    pub fn matches(&self, word: u16) -> bool {
        word & !self.variable == self.fixed1
    }

    /// Every word the template matches.
    pub fn extension(&self) -> Extension {
        Extension::new(*self)
    }
}
