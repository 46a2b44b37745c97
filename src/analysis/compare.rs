//! Side-by-side comparison of two date ranges.

use super::aggregator::{aggregate_composite, aggregate_overall, aggregate_question, round2};
use super::filter::{within, DateRange};
use crate::models::{ChartPoint, Comparison, Composite, Granularity, PeriodSeries, Review};

/// What a comparison averages over.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Overall,
    Composite(&'a Composite),
    Question { id: &'a str, text: &'a str },
}

impl Subject<'_> {
    pub fn label(&self) -> String {
        match self {
            Subject::Overall => "Overall satisfaction".to_string(),
            Subject::Composite(composite) => composite.name.clone(),
            Subject::Question { text, .. } => text.to_string(),
        }
    }

    fn average(&self, reviews: &[Review]) -> f64 {
        let series = match self {
            Subject::Overall => aggregate_overall(reviews, Granularity::Yearly),
            Subject::Composite(composite) => {
                aggregate_composite(reviews, composite, Granularity::Yearly)
            }
            Subject::Question { id, .. } => aggregate_question(reviews, id, Granularity::Yearly),
        };
        match series {
            PeriodSeries::Yearly(point) => point.value,
            other => other.points().first().map_or(0.0, |p| p.value),
        }
    }
}

/// Average `subject` over two ranges.
pub fn compare_periods(
    reviews: &[Review],
    subject: Subject<'_>,
    range_a: &DateRange,
    range_b: &DateRange,
) -> Comparison {
    let a = subject.average(&within(reviews, range_a));
    let b = subject.average(&within(reviews, range_b));

    Comparison {
        subject: subject.label(),
        period_a: ChartPoint::new(format!("Period A ({})", range_a), a),
        period_b: ChartPoint::new(format!("Period B ({})", range_b), b),
        delta: round2(b - a),
    }
}
