pub mod heap_utils;

use std::collections::HashMap;

use num_traits::{AsPrimitive, Float};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::common_types::{Label, LabeledPoint, Neighbor, Point};
use crate::error::{KnnError, Result};
use heap_utils::KBestNeighbors;

/// Calculates the Euclidean distance between two points.
///
/// Coordinates are widened to `f64` before subtracting. `hypot` keeps the
/// result free of intermediate overflow and underflow, so it is zero only for
/// coordinate-equal points.
pub fn euclidean_distance<F>(a: &Point<F>, b: &Point<F>) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    let dx = a.x.as_() - b.x.as_();
    let dy = a.y.as_() - b.y.as_();
    dx.hypot(dy)
}

fn ensure_finite<F>(point: &Point<F>) -> Result<()>
where
    F: Float + AsPrimitive<f64>,
{
    if point.is_finite() {
        Ok(())
    } else {
        Err(KnnError::MalformedPoint { x: point.x.as_(), y: point.y.as_() })
    }
}

/// The fixed, labeled reference data. Iteration order is the tie-break order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet<F = f64> {
    points: Vec<LabeledPoint<F>>,
}

impl<F> TrainingSet<F>
where
    F: Float + AsPrimitive<f64>,
{
    /// Builds a training set, rejecting non-finite coordinates.
    ///
    /// An empty set is accepted here; queries against it fail with
    /// [`KnnError::EmptyTrainingSet`].
    pub fn new(points: Vec<LabeledPoint<F>>) -> Result<Self> {
        for sample in &points {
            ensure_finite(&sample.point)?;
        }
        Ok(Self { points })
    }

    /// Builds a training set from per-class point lists, keeping group order
    /// and then point order within each group.
    pub fn from_groups<I, P>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Label, P)>,
        P: IntoIterator<Item = Point<F>>,
    {
        let points = groups
            .into_iter()
            .flat_map(|(label, points)| points.into_iter().map(move |point| LabeledPoint::new(point, label)))
            .collect();
        Self::new(points)
    }
}

impl<F> TrainingSet<F> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LabeledPoint<F>> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledPoint<F>> {
        self.points.iter()
    }
}

/// How an exact tie in the majority vote is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The tied label latest in [`Label::ALL`] wins (ClassB for two classes).
    #[default]
    LastLabel,
    /// The tied label earliest in [`Label::ALL`] wins.
    FirstLabel,
}

/// Counts labels among `neighbors` and returns the most frequent one.
///
/// Labels are scanned in [`Label::ALL`] order; `tie_break` decides whether an
/// equal count displaces the current leader. Returns `None` for an empty slice.
pub fn majority_vote(neighbors: &[Neighbor], tie_break: TieBreak) -> Option<Label> {
    if neighbors.is_empty() {
        return None;
    }

    let mut label_counts: HashMap<Label, usize> = HashMap::new();
    for neighbor in neighbors {
        *label_counts.entry(neighbor.label).or_insert(0) += 1;
    }

    let mut leader: Option<(Label, usize)> = None;
    for label in Label::ALL {
        let count = label_counts.get(&label).copied().unwrap_or(0);
        let takes_lead = match leader {
            None => true,
            Some((_, best)) => match tie_break {
                TieBreak::LastLabel => count >= best,
                TieBreak::FirstLabel => count > best,
            },
        };
        if takes_lead {
            leader = Some((label, count));
        }
    }
    leader.map(|(label, _)| label)
}

/// The K-Nearest Neighbors Classifier over a fixed 2-D training set.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F = f64> {
    training_set: TrainingSet<F>,
    tie_break: TieBreak,
}

impl<F> KnnClassifier<F>
where
    F: Float + AsPrimitive<f64>,
{
    pub fn new(training_set: TrainingSet<F>) -> Self {
        Self { training_set, tie_break: TieBreak::default() }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn training_set(&self) -> &TrainingSet<F> {
        &self.training_set
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Returns the `k` training points closest to `query`, nearest first.
    ///
    /// Equidistant points keep their training-set order, so the result is the
    /// first `k` entries of a stable sort by distance.
    ///
    /// # Errors
    /// - [`KnnError::EmptyTrainingSet`] if there is no training data.
    /// - [`KnnError::MalformedPoint`] if `query` has a non-finite coordinate.
    /// - [`KnnError::InvalidK`] unless `1 <= k <= training_set.len()`.
    pub fn k_nearest(&self, query: &Point<F>, k: usize) -> Result<Vec<Neighbor>> {
        let n = self.training_set.len();
        if n == 0 {
            return Err(KnnError::EmptyTrainingSet);
        }
        ensure_finite(query)?;
        if k == 0 || k > n {
            return Err(KnnError::InvalidK { k, n });
        }

        let mut best = KBestNeighbors::new(k);
        for (index, sample) in self.training_set.iter().enumerate() {
            best.add(euclidean_distance(query, &sample.point), (index, sample.label));
        }

        let neighbors: Vec<Neighbor> = best
            .into_sorted_points()
            .into_iter()
            .map(|(distance, (index, label))| Neighbor { distance, label, index })
            .collect();
        trace!(x = query.x.as_(), y = query.y.as_(), k, selected = neighbors.len(), "selected nearest neighbors");
        Ok(neighbors)
    }

    /// Predicts the label of `query` by majority vote among its `k` nearest neighbors.
    pub fn classify(&self, query: &Point<F>, k: usize) -> Result<Label> {
        let neighbors = self.k_nearest(query, k)?;
        let label = majority_vote(&neighbors, self.tie_break)
            .ok_or(KnnError::InvalidK { k, n: self.training_set.len() })?;
        let class_a = neighbors.iter().filter(|n| n.label == Label::ClassA).count();
        let class_b = neighbors.len() - class_a;
        debug!(x = query.x.as_(), y = query.y.as_(), k, class_a, class_b, %label, "classified query");
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn demo_set() -> TrainingSet {
        TrainingSet::from_groups([
            (
                Label::ClassA,
                vec![Point::new(1.0, 1.0), Point::new(2.0, 1.0), Point::new(4.0, 1.0), Point::new(2.0, 2.0), Point::new(1.0, 2.5)],
            ),
            (
                Label::ClassB,
                vec![Point::new(3.0, 1.0), Point::new(3.0, 1.5), Point::new(3.0, 2.5), Point::new(4.0, 4.0), Point::new(2.0, 4.0)],
            ),
        ])
        .unwrap()
    }

    fn neighbor(label: Label) -> Neighbor {
        Neighbor { distance: 0.0, label, index: 0 }
    }

    #[test]
    fn test_euclidean_distance() {
        let epsilon = 1e-12;
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < epsilon);
        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
        assert_eq!(euclidean_distance(&b, &b), 0.0);

        let c = Point::new(3.8_f32, 1.2);
        let d = Point::new(4.0_f32, 1.0);
        assert!((euclidean_distance(&c, &d) - 0.0800_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_euclidean_distance_extreme_magnitudes() {
        let origin = Point::new(0.0, 0.0);
        let tiny = euclidean_distance(&origin, &Point::new(1e-200, 0.0));
        assert!(tiny > 0.0);
        assert!((tiny - 1e-200).abs() < 1e-214);

        let huge = euclidean_distance(&Point::new(-1e200, 0.0), &Point::new(1e200, 0.0));
        assert!(huge.is_finite());
        assert!((huge / 2e200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_k_nearest_orders_huge_distances() {
        let set = TrainingSet::from_groups([
            (Label::ClassA, vec![Point::new(-3e200, 0.0)]),
            (Label::ClassB, vec![Point::new(1e200, 0.0)]),
        ])
        .unwrap();
        let classifier = KnnClassifier::new(set);
        let nearest = classifier.k_nearest(&Point::new(0.0, 0.0), 1).unwrap();
        assert_eq!(nearest[0].label, Label::ClassB);
        assert_eq!(nearest[0].index, 1);
        assert!(nearest[0].distance.is_finite());
    }

    #[test]
    fn test_from_groups_keeps_group_then_point_order() {
        let set = demo_set();
        assert_eq!(set.len(), 10);
        assert_eq!(set.get(0), Some(&LabeledPoint::new(Point::new(1.0, 1.0), Label::ClassA)));
        assert_eq!(set.get(5), Some(&LabeledPoint::new(Point::new(3.0, 1.0), Label::ClassB)));
        assert_eq!(set.get(10), None);
    }

    #[test]
    fn test_training_set_rejects_non_finite_points() {
        let err = TrainingSet::new(vec![LabeledPoint::new(Point::new(1.0, f64::NAN), Label::ClassA)]).unwrap_err();
        assert!(matches!(err, KnnError::MalformedPoint { x, .. } if x == 1.0));
    }

    #[test]
    fn test_k_nearest_is_sorted_and_sized() {
        let classifier = KnnClassifier::new(demo_set());
        let neighbors = classifier.k_nearest(&Point::new(3.8, 1.2), 3).unwrap();
        let labels: Vec<Label> = neighbors.iter().map(|n| n.label).collect();
        assert_eq!(labels, vec![Label::ClassA, Label::ClassB, Label::ClassB]);
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![2, 5, 6]);
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_k_equal_to_len_returns_whole_set() {
        let classifier = KnnClassifier::new(demo_set());
        let neighbors = classifier.k_nearest(&Point::new(1.2, 3.2), 10).unwrap();
        let mut indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_equidistant_points_prefer_training_order() {
        let b_first = TrainingSet::from_groups([
            (Label::ClassB, vec![Point::new(1.0, 0.0)]),
            (Label::ClassA, vec![Point::new(-1.0, 0.0)]),
        ])
        .unwrap();
        let classifier = KnnClassifier::new(b_first);
        assert_eq!(classifier.classify(&Point::new(0.0, 0.0), 1).unwrap(), Label::ClassB);

        let a_first = TrainingSet::from_groups([
            (Label::ClassA, vec![Point::new(-1.0, 0.0)]),
            (Label::ClassB, vec![Point::new(1.0, 0.0)]),
        ])
        .unwrap();
        let classifier = KnnClassifier::new(a_first).with_tie_break(TieBreak::LastLabel);
        assert_eq!(classifier.classify(&Point::new(0.0, 0.0), 1).unwrap(), Label::ClassA);
    }

    #[test]
    fn test_invalid_k_is_rejected() {
        let classifier = KnnClassifier::new(demo_set());
        let query = Point::new(1.0, 1.0);
        assert_eq!(classifier.k_nearest(&query, 0), Err(KnnError::InvalidK { k: 0, n: 10 }));
        assert_eq!(classifier.classify(&query, 11), Err(KnnError::InvalidK { k: 11, n: 10 }));
    }

    #[test]
    fn test_empty_training_set_is_rejected_at_query_time() {
        let classifier: KnnClassifier = KnnClassifier::new(TrainingSet::new(Vec::new()).unwrap());
        assert_eq!(classifier.classify(&Point::new(0.0, 0.0), 1), Err(KnnError::EmptyTrainingSet));
        assert_eq!(classifier.k_nearest(&Point::new(0.0, 0.0), 0), Err(KnnError::EmptyTrainingSet));
    }

    #[test]
    fn test_malformed_query_is_rejected() {
        let classifier = KnnClassifier::new(demo_set());
        let err = classifier.classify(&Point::new(f64::INFINITY, 0.0), 1).unwrap_err();
        assert!(matches!(err, KnnError::MalformedPoint { .. }));
    }

    #[test]
    fn test_majority_vote_strict_majority() {
        let votes = [neighbor(Label::ClassB), neighbor(Label::ClassA), neighbor(Label::ClassA)];
        assert_eq!(majority_vote(&votes, TieBreak::LastLabel), Some(Label::ClassA));
        assert_eq!(majority_vote(&votes, TieBreak::FirstLabel), Some(Label::ClassA));
        assert_eq!(majority_vote(&[], TieBreak::LastLabel), None);
    }

    #[test]
    fn test_majority_vote_tie_policies() {
        let votes = [neighbor(Label::ClassA), neighbor(Label::ClassB)];
        assert_eq!(majority_vote(&votes, TieBreak::LastLabel), Some(Label::ClassB));
        assert_eq!(majority_vote(&votes, TieBreak::FirstLabel), Some(Label::ClassA));
    }

    #[test]
    fn test_even_k_tie_uses_configured_policy() {
        // (3.8, 1.2): nearest two are (4, 1) ClassA and (3, 1) ClassB.
        let query = Point::new(3.8, 1.2);
        let default_policy = KnnClassifier::new(demo_set());
        assert_eq!(default_policy.classify(&query, 2).unwrap(), Label::ClassB);
        let first_label = KnnClassifier::new(demo_set()).with_tie_break(TieBreak::FirstLabel);
        assert_eq!(first_label.classify(&query, 2).unwrap(), Label::ClassA);
    }

    #[test]
    fn test_heap_selection_matches_stable_sort() {
        let mut rng = StdRng::seed_from_u64(7);
        // Integer grid coordinates make distance ties common.
        let points: Vec<LabeledPoint> = (0..40)
            .map(|i| {
                let point = Point::new(rng.gen_range(0..6) as f64, rng.gen_range(0..6) as f64);
                let label = if i % 3 == 0 { Label::ClassA } else { Label::ClassB };
                LabeledPoint::new(point, label)
            })
            .collect();
        let classifier = KnnClassifier::new(TrainingSet::new(points.clone()).unwrap());

        for _ in 0..50 {
            let query = Point::new(rng.gen_range(0..6) as f64, rng.gen_range(0..6) as f64);
            let k = rng.gen_range(1..=points.len());

            let mut reference: Vec<(f64, usize)> = points
                .iter()
                .enumerate()
                .map(|(i, p)| (euclidean_distance(&query, &p.point), i))
                .collect();
            reference.sort_by(|a, b| a.0.total_cmp(&b.0));
            let expected: Vec<usize> = reference.iter().take(k).map(|&(_, i)| i).collect();

            let got: Vec<usize> = classifier.k_nearest(&query, k).unwrap().iter().map(|n| n.index).collect();
            assert_eq!(got, expected);
        }
    }
}
