//! Rating aggregation by period.
//!
//! This module turns a snapshot of reviews into chart-ready averages:
//! a single overall bucket, twelve monthly buckets, or week-of-month
//! buckets for one month. Averages are taken over individual ratings,
//! never over per-review or per-question averages.

use crate::models::{Catalog, ChartPoint, Composite, Granularity, PeriodSeries, Review};
use chrono::Datelike;
use std::collections::{BTreeMap, HashSet};

/// Three-letter month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label of the single yearly bucket.
pub const OVERALL_LABEL: &str = "Overall";

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Running sum/count of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub sum: u64,
    pub count: usize,
}

impl RatingTally {
    pub fn add(&mut self, rating: u8) {
        self.sum += u64::from(rating);
        self.count += 1;
    }

    /// Mean rounded to two decimals; zero when nothing was tallied.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            round2(self.sum as f64 / self.count as f64)
        }
    }
}

/// Tally every rating in `reviews` whose question passes `include`.
fn tally<'a, F>(reviews: impl IntoIterator<Item = &'a Review>, include: &F) -> RatingTally
where
    F: Fn(&str) -> bool,
{
    let mut tally = RatingTally::default();
    for review in reviews {
        for answer in &review.answers {
            if let Some(rating) = answer.rating {
                if include(&answer.question_id) {
                    tally.add(rating);
                }
            }
        }
    }
    tally
}

/// Week of month: days 1-7 are week 1, 8-14 week 2, up to week 5.
pub fn week_of_month(day: u32) -> u32 {
    day.div_ceil(7)
}

/// Bucket reviews by granularity and average the ratings accepted by `include`.
fn bucket_series<F>(reviews: &[Review], granularity: Granularity, include: F) -> PeriodSeries
where
    F: Fn(&str) -> bool,
{
    match granularity {
        Granularity::Yearly => PeriodSeries::Yearly(ChartPoint::new(
            OVERALL_LABEL,
            tally(reviews, &include).average(),
        )),
        Granularity::Monthly => {
            let mut tallies = [RatingTally::default(); 12];
            for review in reviews {
                let month = review.month0() as usize;
                let partial = tally(std::iter::once(review), &include);
                tallies[month].sum += partial.sum;
                tallies[month].count += partial.count;
            }
            PeriodSeries::Monthly(std::array::from_fn(|i| {
                ChartPoint::new(MONTH_LABELS[i], tallies[i].average())
            }))
        }
        Granularity::Weekly { month } => {
            // Only weeks that received a review get a bucket.
            let mut weeks: BTreeMap<u32, Vec<&Review>> = BTreeMap::new();
            for review in reviews.iter().filter(|r| r.month0() == month) {
                weeks
                    .entry(week_of_month(review.submitted_at.day()))
                    .or_default()
                    .push(review);
            }
            PeriodSeries::Weekly(
                weeks
                    .into_iter()
                    .map(|(week, members)| {
                        ChartPoint::new(
                            format!("W{}", week),
                            tally(members, &include).average(),
                        )
                    })
                    .collect(),
            )
        }
    }
}

/// Average of every rating in every review.
pub fn aggregate_overall(reviews: &[Review], granularity: Granularity) -> PeriodSeries {
    bucket_series(reviews, granularity, |_| true)
}

/// Average of the ratings given to the composite's member questions.
///
/// Bucket labels and order match [`aggregate_overall`] for the same
/// granularity. A composite without members scores zero everywhere.
pub fn aggregate_composite(
    reviews: &[Review],
    composite: &Composite,
    granularity: Granularity,
) -> PeriodSeries {
    let members: HashSet<&str> = composite.questions.iter().map(String::as_str).collect();
    bucket_series(reviews, granularity, |id| members.contains(id))
}

/// Average of the ratings given to a single question.
pub fn aggregate_question(
    reviews: &[Review],
    question_id: &str,
    granularity: Granularity,
) -> PeriodSeries {
    bucket_series(reviews, granularity, |id| id == question_id)
}

/// Lifetime average per member question, in the composite's stored order.
///
/// Names are the question texts from `catalog` (the id when the question is
/// unknown). The first entry is the featured item of the breakdown view.
pub fn aggregate_question_breakdown(
    reviews: &[Review],
    composite: &Composite,
    catalog: &Catalog,
) -> Vec<ChartPoint> {
    composite
        .questions
        .iter()
        .map(|question_id| {
            let mut tally = RatingTally::default();
            for review in reviews {
                let answer = review
                    .answers
                    .iter()
                    .find(|a| &a.question_id == question_id);
                if let Some(rating) = answer.and_then(|a| a.rating) {
                    tally.add(rating);
                }
            }
            ChartPoint::new(catalog.question_text(question_id), tally.average())
        })
        .collect()
}
