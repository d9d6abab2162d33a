//! Small aggregation helpers shared by the dashboard pages

use crate::portfolio::percentile;
use chrono::NaiveDate;
use serde::Serialize;

/// Equal-width bins; the last bin is closed on the right
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` bin boundaries
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins spanning the sample's own range
    pub fn new(values: &[f64], bins: usize) -> Self {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::over(values, bins, lo, hi)
    }

    /// Bins spanning `[lo, hi]`; values outside the range are dropped
    pub fn over(values: &[f64], bins: usize, lo: f64, hi: f64) -> Self {
        if bins == 0 || !lo.is_finite() || !hi.is_finite() {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) };
        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values {
            if v < lo || v > hi || v.is_nan() {
                continue;
            }
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Self { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Count, sum and mean of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub label: String,
    pub count: usize,
    pub total: f64,
    /// None for an empty group
    pub mean: Option<f64>,
}

/// Group `items` by the index `key` returns into `labels`, aggregating `value`
///
/// Items whose key is `None` or out of range are skipped.
pub fn group_by<T, L, K, V>(items: &[T], labels: &[L], key: K, value: V) -> Vec<GroupStat>
where
    L: ToString,
    K: Fn(&T) -> Option<usize>,
    V: Fn(&T) -> f64,
{
    let mut sums = vec![(0usize, 0.0f64); labels.len()];
    for item in items {
        if let Some(slot) = key(item).and_then(|i| sums.get_mut(i)) {
            slot.0 += 1;
            slot.1 += value(item);
        }
    }
    labels
        .iter()
        .zip(sums)
        .map(|(label, (count, total))| GroupStat {
            label: label.to_string(),
            count,
            total,
            mean: (count > 0).then(|| total / count as f64),
        })
        .collect()
}

/// Mean of `value` per (row, column) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `values[row][column]`, None where the cell is empty
    pub values: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    pub fn mean_grid<T, C, V>(items: &[T], rows: &[&str], columns: &[&str], cell: C, value: V) -> Self
    where
        C: Fn(&T) -> Option<(usize, usize)>,
        V: Fn(&T) -> f64,
    {
        let mut sums = vec![vec![(0usize, 0.0f64); columns.len()]; rows.len()];
        for item in items {
            if let Some((r, c)) = cell(item) {
                if let Some(slot) = sums.get_mut(r).and_then(|row| row.get_mut(c)) {
                    slot.0 += 1;
                    slot.1 += value(item);
                }
            }
        }
        Self {
            rows: rows.iter().map(|s| s.to_string()).collect(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            values: sums
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(n, total)| (n > 0).then(|| total / n as f64))
                        .collect()
                })
                .collect(),
        }
    }

    /// Replace empty cells with `fill`
    pub fn filled(mut self, fill: f64) -> Self {
        for row in &mut self.values {
            for cell in row.iter_mut() {
                cell.get_or_insert(fill);
            }
        }
        self
    }
}

/// Location and spread of a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub p95: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn of(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values.iter().copied()),
            median: percentile(values, 50.0).ok(),
            p95: percentile(values, 95.0).ok(),
            max: values.iter().copied().reduce(f64::max),
        }
    }
}

/// Dated value for line charts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

pub fn dated<I>(dates: &[NaiveDate], values: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = Option<f64>>,
{
    dates
        .iter()
        .zip(values)
        .map(|(&date, value)| SeriesPoint { date, value })
        .collect()
}

/// Feature name with its display weight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: &'static str,
    pub weight: f64,
}

pub fn feature_weights(pairs: Vec<(&'static str, f64)>) -> Vec<FeatureWeight> {
    pairs
        .into_iter()
        .map(|(feature, weight)| FeatureWeight { feature, weight })
        .collect()
}

pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (n, total) = values.into_iter().fold((0usize, 0.0), |(n, t), v| (n + 1, t + v));
    (n > 0).then(|| total / n as f64)
}

/// Share of `true` flags, 0 for an empty sample
pub fn share<I: IntoIterator<Item = bool>>(flags: I) -> f64 {
    mean(flags.into_iter().map(|f| if f { 1.0 } else { 0.0 })).unwrap_or(0.0)
}

/// Percentage rounded to one decimal place
pub fn pct(fraction: f64) -> f64 {
    crate::scoring::round_to(fraction * 100.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0];
        let hist = Histogram::new(&values, 4);
        assert_eq!(hist.edges.len(), 5);
        assert_eq!(hist.counts, vec![2, 0, 1, 2]);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(Histogram::new(&[], 10).counts.is_empty());
        let flat = Histogram::new(&[3.0, 3.0], 2);
        assert_eq!(flat.total(), 2);
    }

    #[test]
    fn test_group_by_rates() {
        let items = [(0, 1.0), (0, 0.0), (1, 1.0), (5, 1.0)];
        let groups = group_by(&items, &["a", "b", "c"], |i| Some(i.0), |i| i.1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].mean, Some(0.5));
        assert_eq!(groups[1].total, 1.0);
        assert_eq!(groups[2].mean, None);
    }

    #[test]
    fn test_heatmap_fill() {
        let items = [((0, 0), 2.0), ((0, 0), 4.0), ((1, 1), 1.0)];
        let heat = Heatmap::mean_grid(&items, &["r0", "r1"], &["c0", "c1"], |i| Some(i.0), |i| i.1);
        assert_eq!(heat.values[0][0], Some(3.0));
        assert_eq!(heat.values[0][1], None);
        assert_eq!(heat.filled(0.0).values[0][1], Some(0.0));
    }

    #[test]
    fn test_summary_and_share() {
        let summary = Summary::of(&[1.0, 2.0, 3.0, 10.0]);
        assert_eq!(summary.mean, Some(4.0));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.max, Some(10.0));
        assert_eq!(Summary::of(&[]).mean, None);
        assert_eq!(share([true, false, false, true]), 0.5);
        assert_eq!(pct(0.12345), 12.3);
    }
}
