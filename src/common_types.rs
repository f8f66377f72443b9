//! This module contains the data model shared by the classifier, the batch driver and the binary.

use std::fmt;

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A 2-D query or training location.
///
/// - `F`: The coordinate type (e.g., `f64`, `f32`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<F = f64> {
    pub x: F,
    pub y: F,
}

impl<F> Point<F> {
    pub fn new(x: F, y: F) -> Self {
        Point { x, y }
    }
}

impl<F: Float> Point<F> {
    /// Returns `true` when neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: fmt::Display> fmt::Display for Point<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The class attached to a training point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    ClassA,
    ClassB,
}

impl Label {
    /// Every label in precedence order. Vote tie-breaking walks this slice.
    pub const ALL: [Label; 2] = [Label::ClassA, Label::ClassB];
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::ClassA => f.write_str("Class A"),
            Label::ClassB => f.write_str("Class B"),
        }
    }
}

/// A training sample: a location plus its class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint<F = f64> {
    pub point: Point<F>,
    pub label: Label,
}

impl<F> LabeledPoint<F> {
    pub fn new(point: Point<F>, label: Label) -> Self {
        LabeledPoint { point, label }
    }
}

/// One entry of a k-nearest result, scoped to a single query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub distance: f64,
    pub label: Label,
    /// Position of the matching point in the training set.
    pub index: usize,
}
