//! k-nearest-neighbors classification of 2-D points.
//!
//! The classifier holds a fixed [`TrainingSet`] of labeled points. A query is
//! classified by scanning every training point, keeping the `k` closest
//! (equidistant points resolved by training-set order) and taking a majority
//! vote over their labels.
//!
//! ```
//! use knn_classifier::{KnnClassifier, Label, Point, TrainingSet};
//!
//! let training_set = TrainingSet::from_groups([
//!     (Label::ClassA, vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]),
//!     (Label::ClassB, vec![Point::new(5.0, 5.0)]),
//! ])?;
//! let classifier = KnnClassifier::new(training_set);
//! assert_eq!(classifier.classify(&Point::new(0.5, 0.5), 3)?, Label::ClassA);
//! # Ok::<(), knn_classifier::KnnError>(())
//! ```

pub mod batch;
pub mod common_types;
pub mod config;
pub mod error;
pub mod knn;

pub use batch::{Classification, classify_batch};
pub use common_types::{Label, LabeledPoint, Neighbor, Point};
pub use config::ScenarioConfig;
pub use error::{ConfigError, KnnError, Result};
pub use knn::{KnnClassifier, TieBreak, TrainingSet, euclidean_distance, majority_vote};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::common_types::{Label, LabeledPoint, Point};
    use crate::error::KnnError;
    use crate::knn::{self, KnnClassifier, TieBreak, TrainingSet};

    fn to_py_err(err: KnnError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Python-friendly representation of Label
    #[pyclass(name = "Label")]
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum PyLabel {
        ClassA,
        ClassB,
    }

    impl From<PyLabel> for Label {
        fn from(val: PyLabel) -> Self {
            match val {
                PyLabel::ClassA => Label::ClassA,
                PyLabel::ClassB => Label::ClassB,
            }
        }
    }

    impl From<Label> for PyLabel {
        fn from(val: Label) -> Self {
            match val {
                Label::ClassA => PyLabel::ClassA,
                Label::ClassB => PyLabel::ClassB,
            }
        }
    }

    fn tie_break_for(prefer_first_label: bool) -> TieBreak {
        if prefer_first_label { TieBreak::FirstLabel } else { TieBreak::LastLabel }
    }

    /// Calculates the Euclidean distance between two `(x, y)` tuples.
    #[pyfunction]
    fn euclidean_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        knn::euclidean_distance(&Point::new(a.0, a.1), &Point::new(b.0, b.1))
    }

    #[pyclass(name = "KnnClassifier")]
    struct PyKnnClassifier {
        classifier: KnnClassifier,
    }

    #[pymethods]
    impl PyKnnClassifier {
        /// `training_data` is a list of `(x, y, Label)` tuples.
        #[new]
        #[pyo3(signature = (training_data, prefer_first_label = false))]
        fn new(training_data: Vec<(f64, f64, PyLabel)>, prefer_first_label: bool) -> PyResult<Self> {
            let points = training_data
                .into_iter()
                .map(|(x, y, label)| LabeledPoint::new(Point::new(x, y), label.into()))
                .collect();
            let training_set = TrainingSet::new(points).map_err(to_py_err)?;
            Ok(PyKnnClassifier { classifier: KnnClassifier::new(training_set).with_tie_break(tie_break_for(prefer_first_label)) })
        }

        fn classify(&self, x: f64, y: f64, k: usize) -> PyResult<PyLabel> {
            self.classifier.classify(&Point::new(x, y), k).map(PyLabel::from).map_err(to_py_err)
        }

        /// Returns `(distance, Label)` pairs, nearest first.
        fn k_nearest(&self, x: f64, y: f64, k: usize) -> PyResult<Vec<(f64, PyLabel)>> {
            let neighbors = self.classifier.k_nearest(&Point::new(x, y), k).map_err(to_py_err)?;
            Ok(neighbors.into_iter().map(|n| (n.distance, n.label.into())).collect())
        }

        fn __len__(&self) -> usize {
            self.classifier.training_set().len()
        }
    }

    /// Python extension module; the name matches the compiled library.
    #[pymodule]
    fn knn_classifier(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(euclidean_distance, m)?)?;
        m.add_class::<PyLabel>()?;
        m.add_class::<PyKnnClassifier>()?;
        Ok(())
    }

}
