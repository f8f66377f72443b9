//! Scenario configuration: training data, queries and k-values loaded from TOML.
//!
//! A scenario file looks like:
//!
//! ```toml
//! tie_break = "last-label"
//! ks = [1, 3, 5]
//! queries = [{ x = 3.8, y = 1.2 }, { x = 1.2, y = 3.2 }]
//!
//! [[training]]
//! label = "ClassA"
//! point = { x = 1.0, y = 1.0 }
//!
//! [[training]]
//! label = "ClassB"
//! point = { x = 3.0, y = 1.0 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common_types::{Label, LabeledPoint, Point};
use crate::error::ConfigError;
use crate::knn::{KnnClassifier, TieBreak, TrainingSet};

/// A complete classification run described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Vote tie policy; `last-label` when omitted.
    #[serde(default)]
    pub tie_break: TieBreak,
    /// k-values evaluated for every query, in order.
    pub ks: Vec<usize>,
    /// Query points, in order.
    pub queries: Vec<Point>,
    /// Labeled training points, in tie-break order.
    pub training: Vec<LabeledPoint>,
}

impl ScenarioConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The two-class demo: five ClassA points, five ClassB points, three
    /// queries and k = 1, 3, 5.
    pub fn demo() -> Self {
        let class_a = [(1.0, 1.0), (2.0, 1.0), (4.0, 1.0), (2.0, 2.0), (1.0, 2.5)];
        let class_b = [(3.0, 1.0), (3.0, 1.5), (3.0, 2.5), (4.0, 4.0), (2.0, 4.0)];
        let training = class_a
            .iter()
            .map(|&(x, y)| LabeledPoint::new(Point::new(x, y), Label::ClassA))
            .chain(class_b.iter().map(|&(x, y)| LabeledPoint::new(Point::new(x, y), Label::ClassB)))
            .collect();

        ScenarioConfig {
            tie_break: TieBreak::default(),
            ks: vec![1, 3, 5],
            queries: vec![Point::new(3.8, 1.2), Point::new(1.2, 3.2), Point::new(4.0, 3.2)],
            training,
        }
    }

    /// Validates the training data and builds a classifier with the configured tie policy.
    pub fn build_classifier(&self) -> Result<KnnClassifier, ConfigError> {
        let training_set = TrainingSet::new(self.training.clone())?;
        Ok(KnnClassifier::new(training_set).with_tie_break(self.tie_break))
    }
}
