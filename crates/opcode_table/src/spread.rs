use std::iter::FusedIterator;

use crate::masks::BitMasks;

/// Distributes the bits of `x` over the set bits of `mask`, lowest first: bit 0 of `x` lands on
/// the lowest set bit of `mask`, bit 1 on the next one up, and so on. Bits of `x` beyond the
/// number of set bits in `mask` are dropped.
pub fn spread(mask: u16, x: u16) -> u16 {
    let mut result = 0;
    let mut x = x;
    let mut remaining = mask;

    while x != 0 && remaining != 0 {
        let lowest = remaining & remaining.wrapping_neg();
        if x & 1 != 0 {
            result |= lowest;
        }
        x >>= 1;
        remaining &= !lowest;
    }

    result
}

/// The inverse of [spread]: collects the bits of `word` at the set bits of `mask` into a
/// contiguous value, lowest first.
pub fn gather(mask: u16, word: u16) -> u16 {
    let mut result = 0;
    let mut shift = 0;
    let mut remaining = mask;

    while remaining != 0 {
        let lowest = remaining & remaining.wrapping_neg();
        if word & lowest != 0 {
            result |= 1 << shift;
        }
        shift += 1;
        remaining &= !lowest;
    }

    result
}

/// Iterates over every word matched by a template, in order of the spread value.
#[derive(Clone, Debug)]
pub struct Extension {
    masks: BitMasks,
    next: u32,
    end: u32,
}

impl Extension {
    pub fn new(masks: BitMasks) -> Self {
        Self {
            masks,
            next: 0,
            end: 1 << masks.width(),
        }
    }
}

impl Iterator for Extension {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let word = self.masks.fixed1 | spread(self.masks.variable, self.next as u16);
        self.next += 1;
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Extension {}

impl FusedIterator for Extension {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use data_sheet::Template;

    use super::*;

    fn masks(pattern: &str) -> BitMasks {
        BitMasks::from_template(&Template::new(pattern, "X").unwrap())
    }

    #[test]
    fn spread_lowest_bit_first() {
        assert_eq!(spread(0b1010_0100, 0b001), 0b0000_0100);
        assert_eq!(spread(0b1010_0100, 0b010), 0b0010_0000);
        assert_eq!(spread(0b1010_0100, 0b100), 0b1000_0000);
        assert_eq!(spread(0b1010_0100, 0b111), 0b1010_0100);
        assert_eq!(spread(0, 0b111), 0);
        assert_eq!(spread(0xffff, 0x1234), 0x1234);
    }

    #[test]
    fn gather_inverts_spread() {
        let mask: u16 = 0x2df7;
        for x in 0..1 << mask.count_ones() {
            assert_eq!(gather(mask, spread(mask, x)), x);
        }
    }

    #[test]
    fn single_word() {
        let words: Vec<_> = masks("1111000111011111").extension().collect();
        assert_eq!(words, vec![0xf1df]);
    }

    #[test]
    fn extension_is_exact() {
        let m = masks("10q0qq0ddddd1qqq");
        let extension = m.extension();
        assert_eq!(extension.len(), 1 << 11);

        let words: HashSet<u16> = extension.clone().collect();
        assert_eq!(words.len(), 1 << 11);

        for word in extension {
            assert!(m.matches(word));
            assert_eq!(word & !m.variable, m.fixed1);
            assert_eq!(spread(m.variable, gather(m.variable, word)) | m.fixed1, word);
        }
    }

    #[test]
    fn whole_word_space() {
        let m = masks("kkkkkkkkkkkkkkkk");
        let mut extension = m.extension();
        assert_eq!(extension.len(), 0x10000);
        assert_eq!(extension.nth(0xffff), Some(0xffff));
        assert_eq!(extension.next(), None);
    }
}
