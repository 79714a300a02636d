// Persondays trend over the fetched months.
//
// Records arrive newest first; the series is oldest first. Months whose
// persondays are missing, unparseable or zero are left out, and a series
// with fewer than two points is not a trend.
use crate::fields::{resolve, CanonicalKey, Resolved};
use crate::types::PerformanceRecord;
use crate::util::{average, group_indian, value_as_f64, value_text};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub mean: f64,
}

impl TrendSeries {
    pub fn min(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean rounded to a whole number of days.
    pub fn mean_display(&self) -> String {
        group_indian(self.mean.round())
    }

    pub fn sparkline(&self) -> String {
        let (lo, hi) = (self.min(), self.max());
        let span = hi - lo;
        self.points
            .iter()
            .map(|p| {
                if span <= 0.0 {
                    return BARS[BARS.len() / 2];
                }
                let idx = ((p.value - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            })
            .collect()
    }
}

fn text_or_empty(record: &PerformanceRecord, key: CanonicalKey) -> String {
    match resolve(record, key) {
        Resolved::Value(v) => value_text(&v),
        Resolved::Unavailable => String::new(),
    }
}

/// `"{month}/{fin_year}"`, with missing parts left empty.
pub fn period_label(record: &PerformanceRecord) -> String {
    format!(
        "{}/{}",
        text_or_empty(record, CanonicalKey::Month),
        text_or_empty(record, CanonicalKey::FinYear)
    )
}

pub fn build_trend(records: &[PerformanceRecord]) -> Option<TrendSeries> {
    let points: Vec<TrendPoint> = records
        .iter()
        .rev()
        .filter_map(|r| {
            let value = match resolve(r, CanonicalKey::PersondaysGenerated) {
                Resolved::Value(v) => value_as_f64(&v)?,
                Resolved::Unavailable => return None,
            };
            if value == 0.0 {
                return None;
            }
            Some(TrendPoint { label: period_label(r), value })
        })
        .collect();

    if points.len() < 2 {
        tracing::debug!(points = points.len(), "not enough months for a trend");
        return None;
    }
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let mean = average(&values);
    Some(TrendSeries { points, mean })
}
