use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use data_sheet::{bit_index, Template};
use tracing::info;

use crate::segment::Field;

/// Stands in for every fixed bit in a [Shape].
pub const PLACEHOLDER: char = '-';

/// A template with its fixed bits blanked out. Templates that only differ in fixed bits share the
/// same operand layout and so the same extraction code.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Shape(String);

impl Shape {
    pub fn from_template(template: &Template) -> Self {
        Self(
            template
                .pattern()
                .chars()
                .map(|c| match c {
                    '0' | '1' => PLACEHOLDER,
                    c => c,
                })
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Operand letters in the order they first appear, reading from the most significant bit.
    pub fn letters(&self) -> Vec<char> {
        let mut letters = vec![];
        for c in self.0.chars().filter(|&c| c != PLACEHOLDER) {
            if !letters.contains(&c) {
                letters.push(c);
            }
        }
        letters
    }

    /// The bits of the instruction word holding `letter`.
    pub fn occupancy(&self, letter: char) -> u16 {
        self.0
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == letter)
            .fold(0, |mask, (position, _)| mask | 1 << bit_index(position))
    }

    pub fn fields(&self) -> Vec<Field> {
        self.letters()
            .into_iter()
            .map(|letter| Field::new(letter, self.occupancy(letter)))
            .collect()
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A distinct shape with the extraction of each of its operands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShapeLayout {
    pub shape: Shape,
    pub fields: Vec<Field>,
}

/// Layouts for every distinct shape among `templates`, sorted by shape.
pub fn layouts(templates: &[Template]) -> Vec<ShapeLayout> {
    let shapes: BTreeSet<Shape> = templates.iter().map(Shape::from_template).collect();

    info!("{} distinct template shapes", shapes.len());

    shapes
        .into_iter()
        .map(|shape| ShapeLayout {
            fields: shape.fields(),
            shape,
        })
        .collect()
}
