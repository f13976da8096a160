//! Sense distribution over classified lines.

use crate::labels::{Classification, Label, NOT_APPLICABLE_BUCKET};

/// Count of labelled lines per bucket.
///
/// Bucket `0` collects every line without a sense; buckets `1..=N` follow the
/// sense ordinals.
///
/// # Examples
/// ```
/// use sensedist_core::{Histogram, Label};
///
/// let labels = [Some(Label::Absent), Some(Label::parse_token("2", 2).expect("valid")), None];
/// let histogram = Histogram::from_labels(2, labels);
/// assert_eq!(histogram.counts(), &[1, 0, 1]);
/// assert_eq!(histogram.total(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<usize>,
}

/// One bucket's share of the labelled lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketShare {
    /// Bucket index; `0` is the not-applicable bucket.
    pub bucket: usize,
    /// Lines in the bucket.
    pub count: usize,
    /// Floor of the bucket's percentage of all labelled lines.
    pub percent: usize,
}

impl BucketShare {
    /// Returns `true` for the bucket of lines without a sense.
    #[must_use]
    pub fn is_not_applicable(&self) -> bool {
        self.bucket == NOT_APPLICABLE_BUCKET
    }
}

impl Histogram {
    /// Builds an empty histogram for an inventory of `sense_count` senses.
    #[must_use]
    pub fn new(sense_count: usize) -> Self {
        Self {
            counts: vec![0; sense_count + 1],
        }
    }

    /// Counts `labels`; `None` entries are ignored.
    ///
    /// Labels are assumed to have been validated against `sense_count`;
    /// out-of-range ordinals grow the histogram rather than panic.
    #[must_use]
    pub fn from_labels<I>(sense_count: usize, labels: I) -> Self
    where
        I: IntoIterator<Item = Option<Label>>,
    {
        let mut histogram = Self::new(sense_count);
        for label in labels.into_iter().flatten() {
            histogram.record(label);
        }
        histogram
    }

    /// Counts the labels of a parsed classification.
    #[must_use]
    pub fn from_classification(sense_count: usize, classification: &Classification) -> Self {
        Self::from_labels(sense_count, classification.labels().iter().copied())
    }

    fn record(&mut self, label: Label) {
        let bucket = label.bucket();
        if bucket >= self.counts.len() {
            self.counts.resize(bucket + 1, 0);
        }
        if let Some(count) = self.counts.get_mut(bucket) {
            *count += 1;
        }
    }

    /// Raw counts indexed by bucket.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of sense buckets, excluding the not-applicable bucket.
    #[must_use]
    pub fn sense_count(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Total labelled lines.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Per-bucket shares in bucket order, or `None` when nothing was labelled.
    ///
    /// Percentages are floored, so they may sum to slightly less than 100.
    ///
    /// # Examples
    /// ```
    /// use sensedist_core::Histogram;
    ///
    /// assert!(Histogram::new(2).shares().is_none());
    /// ```
    #[must_use]
    pub fn shares(&self) -> Option<Vec<BucketShare>> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(
            self.counts
                .iter()
                .enumerate()
                .map(|(bucket, &count)| BucketShare {
                    bucket,
                    count,
                    percent: count * 100 / total,
                })
                .collect(),
        )
    }

    /// The `limit` largest non-empty buckets, largest first; ties go to the
    /// lower bucket.
    #[must_use]
    pub fn largest_buckets(&self, limit: usize) -> Vec<usize> {
        let mut buckets: Vec<(usize, usize)> = self
            .counts
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect();
        buckets.sort_by(|(left_bucket, left), (right_bucket, right)| {
            right.cmp(left).then(left_bucket.cmp(right_bucket))
        });
        buckets
            .into_iter()
            .take(limit)
            .map(|(bucket, _)| bucket)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use proptest::prelude::*;
    use rstest::rstest;

    fn sense(ordinal: usize) -> Option<Label> {
        NonZeroUsize::new(ordinal).map(Label::Sense)
    }

    #[test]
    fn bank_scenario_distribution() {
        let labels = [Some(Label::Absent), sense(2), Some(Label::Absent)];
        let histogram = Histogram::from_labels(2, labels);
        assert_eq!(histogram.counts(), &[2, 0, 1]);

        let shares = histogram.shares().unwrap_or_default();
        let percents: Vec<usize> = shares.iter().map(|share| share.percent).collect();
        assert_eq!(percents, vec![66, 0, 33]);
        assert!(shares[0].is_not_applicable());
    }

    #[test]
    fn undecided_lines_count_as_not_applicable() {
        let histogram = Histogram::from_labels(1, [Some(Label::Undecided), sense(1)]);
        assert_eq!(histogram.counts(), &[1, 1]);
    }

    #[test]
    fn zero_total_has_no_shares() {
        let histogram = Histogram::from_labels(3, [None, None]);
        assert_eq!(histogram.total(), 0);
        assert!(histogram.shares().is_none());
    }

    #[test]
    fn zero_senses_keeps_the_not_applicable_bucket() {
        let histogram = Histogram::from_labels(0, [Some(Label::Absent)]);
        assert_eq!(histogram.counts(), &[1]);
        assert_eq!(histogram.sense_count(), 0);
    }

    #[rstest]
    #[case(1, vec![1])]
    #[case(2, vec![1, 0])]
    #[case(5, vec![1, 0, 2])]
    fn largest_buckets_orders_by_count_then_bucket(
        #[case] limit: usize,
        #[case] expected: Vec<usize>,
    ) {
        let labels = [
            sense(1),
            sense(1),
            Some(Label::Absent),
            sense(2),
            Some(Label::Absent),
            sense(1),
            sense(2),
        ];
        // counts: N/A 2, sense 1 3, sense 2 2
        let histogram = Histogram::from_labels(3, labels);
        assert_eq!(histogram.largest_buckets(limit), expected);
    }

    fn label_strategy(sense_count: usize) -> impl Strategy<Value = Option<Label>> {
        (0..=sense_count + 2).prop_map(move |raw| match raw {
            0 => None,
            1 => Some(Label::Absent),
            2 => Some(Label::Undecided),
            ordinal => sense(ordinal - 2),
        })
    }

    fn labelled_histogram() -> impl Strategy<Value = (usize, Vec<Option<Label>>)> {
        (1_usize..6).prop_flat_map(|n| {
            prop::collection::vec(label_strategy(n), 0..64).prop_map(move |labels| (n, labels))
        })
    }

    proptest! {
        #[test]
        fn counts_sum_to_labelled_lines(labels in labelled_histogram()) {
            let (sense_count, labels) = labels;
            let labelled = labels.iter().flatten().count();
            let histogram = Histogram::from_labels(sense_count, labels);
            prop_assert_eq!(histogram.total(), labelled);
            prop_assert_eq!(histogram.counts().len(), sense_count + 1);
        }

        #[test]
        fn floored_percentages_stay_within_bucket_count_of_100(
            counts in prop::collection::vec(0_usize..1000, 1..8)
        ) {
            let histogram = Histogram { counts };
            if let Some(shares) = histogram.shares() {
                let sum: usize = shares.iter().map(|share| share.percent).sum();
                prop_assert!(sum <= 100);
                prop_assert!(sum + shares.len() >= 100);
            }
        }
    }
}
