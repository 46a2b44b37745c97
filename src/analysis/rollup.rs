//! Keyed period rollups.
//!
//! Computes daily, ISO-week, monthly and yearly rating averages for every
//! period that appears in a snapshot, in one pass.

use super::aggregator::RatingTally;
use crate::models::{Review, TrendRow};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which rollup granularity a trend table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

/// Averages keyed by `YYYY-MM-DD`, `YYYY-Www`, `YYYY-MM` and `YYYY`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollup {
    pub daily: Vec<TrendRow>,
    pub weekly: Vec<TrendRow>,
    pub monthly: Vec<TrendRow>,
    pub yearly: Vec<TrendRow>,
}

impl Rollup {
    /// Take the rows of one granularity.
    pub fn select(self, period: RollupPeriod) -> Vec<TrendRow> {
        match period {
            RollupPeriod::Daily => self.daily,
            RollupPeriod::Weekly => self.weekly,
            RollupPeriod::Monthly => self.monthly,
            RollupPeriod::Yearly => self.yearly,
        }
    }
}

#[derive(Default)]
struct Accumulator(BTreeMap<String, RatingTally>);

impl Accumulator {
    fn add(&mut self, key: String, review: &Review) {
        let tally = self.0.entry(key).or_default();
        for rating in review.ratings() {
            tally.add(rating);
        }
    }

    fn finish(self) -> Vec<TrendRow> {
        self.0
            .into_iter()
            .filter(|(_, tally)| tally.count > 0)
            .map(|(key, tally)| TrendRow {
                key,
                value: tally.average(),
                ratings: tally.count,
            })
            .collect()
    }
}

/// Roll ratings up into every period granularity at once.
pub fn rollup(reviews: &[Review]) -> Rollup {
    let mut daily = Accumulator::default();
    let mut weekly = Accumulator::default();
    let mut monthly = Accumulator::default();
    let mut yearly = Accumulator::default();

    for review in reviews {
        let date = review.date();
        let iso = date.iso_week();

        daily.add(date.format("%Y-%m-%d").to_string(), review);
        weekly.add(format!("{}-W{:02}", iso.year(), iso.week()), review);
        monthly.add(date.format("%Y-%m").to_string(), review);
        yearly.add(date.year().to_string(), review);
    }

    Rollup {
        daily: daily.finish(),
        weekly: weekly.finish(),
        monthly: monthly.finish(),
        yearly: yearly.finish(),
    }
}
