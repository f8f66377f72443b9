//! Runs the classifier over every (query, k) pair of a scenario.

use std::fmt;

use num_traits::{AsPrimitive, Float};
use serde::Serialize;
use tracing::info;

use crate::common_types::{Label, Point};
use crate::error::Result;
use crate::knn::KnnClassifier;

/// One result record of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification<F = f64> {
    pub query: Point<F>,
    pub k: usize,
    pub label: Label,
}

impl<F: fmt::Display> fmt::Display for Classification<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {} when using {} neighbors", self.query, self.label, self.k)
    }
}

/// Classifies each query with each k, query-major, in the order supplied.
///
/// Stops at the first failing pair; no partial output is returned.
pub fn classify_batch<F>(classifier: &KnnClassifier<F>, queries: &[Point<F>], ks: &[usize]) -> Result<Vec<Classification<F>>>
where
    F: Float + AsPrimitive<f64>,
{
    let mut records = Vec::with_capacity(queries.len() * ks.len());
    for query in queries {
        for &k in ks {
            let label = classifier.classify(query, k)?;
            records.push(Classification { query: *query, k, label });
        }
    }
    info!(queries = queries.len(), ks = ks.len(), records = records.len(), "batch classified");
    Ok(records)
}
