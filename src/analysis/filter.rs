//! Review scoping by category and date window.

use crate::models::{Catalog, Category, Review};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!("range start {} is after end {}", start, end));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = String;

    /// Parses `YYYY-MM-DD..YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| format!("expected START..END, got '{}'", s))?;
        let parse = |part: &str| {
            NaiveDate::parse_from_str(part.trim(), "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{}': {}", part.trim(), e))
        };
        DateRange::new(parse(start)?, parse(end)?)
    }
}

/// Narrowing applied to a review snapshot before aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub category: Option<Category>,
    pub year: Option<i32>,
    pub range: Option<DateRange>,
}

impl ReviewFilter {
    /// Returns true if the review's category and date pass the filter.
    pub fn matches(&self, review: &Review) -> bool {
        let date = review.date();
        self.category.map_or(true, |c| review.category == c)
            && self.year.map_or(true, |y| date.year() == y)
            && self.range.map_or(true, |r| r.contains(date))
    }

    /// Copy the matching reviews out of `reviews`.
    ///
    /// With a category set, answers to questions the catalog files under a
    /// different category, or does not know at all, are dropped as well, so
    /// every remaining rating belongs to the requested category.
    pub fn apply(&self, reviews: &[Review], catalog: &Catalog) -> Vec<Review> {
        reviews
            .iter()
            .filter(|r| self.matches(r))
            .map(|review| {
                let mut review = review.clone();
                if let Some(category) = self.category {
                    review.answers.retain(|a| {
                        catalog
                            .question(&a.question_id)
                            .is_some_and(|q| q.category == category)
                    });
                }
                review
            })
            .collect()
    }

    /// Human-readable description of the window.
    pub fn describe(&self) -> String {
        match (self.year, self.range) {
            (Some(year), Some(range)) => format!("{} ({})", year, range),
            (Some(year), None) => year.to_string(),
            (None, Some(range)) => range.to_string(),
            (None, None) => "all time".to_string(),
        }
    }
}

/// Reviews submitted inside `range`.
pub fn within(reviews: &[Review], range: &DateRange) -> Vec<Review> {
    reviews
        .iter()
        .filter(|r| range.contains(r.date()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, Question, QuestionType};
    use chrono::DateTime;

    fn review(category: Category, timestamp: &str, question_ids: &[&str]) -> Review {
        Review {
            id: timestamp.to_string(),
            submitted_at: DateTime::parse_from_rfc3339(timestamp).unwrap(),
            category,
            answers: question_ids
                .iter()
                .map(|q| Answer {
                    question_id: q.to_string(),
                    rating: Some(5),
                    answer_boolean: None,
                })
                .collect(),
            description: None,
            room_guest_info: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_parsing() {
        let range: DateRange = "2024-01-01..2024-01-31".parse().unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 31));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));

        assert!("2024-02-01..2024-01-01".parse::<DateRange>().is_err());
        assert!("2024-02-01".parse::<DateRange>().is_err());
        assert!("2024-02-30..2024-03-01".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_filter_by_category_year_and_range() {
        let reviews = vec![
            review(Category::Room, "2024-01-10T10:00:00Z", &["q1"]),
            review(Category::Room, "2023-01-10T10:00:00Z", &["q1"]),
            review(Category::FoodAndBeverage, "2024-01-10T10:00:00Z", &["q1"]),
            review(Category::Room, "2024-03-10T10:00:00Z", &["q1"]),
        ];

        let filter = ReviewFilter {
            category: Some(Category::Room),
            year: Some(2024),
            range: Some(DateRange::new(date(2024, 1, 1), date(2024, 2, 29)).unwrap()),
        };

        let kept = filter.apply(&reviews, &Catalog::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "2024-01-10T10:00:00Z");
        assert_eq!(kept[0].category, Category::Room);
    }

    #[test]
    fn test_category_filter_drops_foreign_answers() {
        let catalog = Catalog {
            questions: vec![
                Question {
                    id: "room-q".to_string(),
                    text: "Bed comfort".to_string(),
                    category: Category::Room,
                    question_type: QuestionType::Rating,
                    order: 0,
                },
                Question {
                    id: "fb-q".to_string(),
                    text: "Breakfast".to_string(),
                    category: Category::FoodAndBeverage,
                    question_type: QuestionType::Rating,
                    order: 0,
                },
            ],
            composites: Vec::new(),
        };
        let reviews = vec![review(
            Category::Room,
            "2024-05-05T10:00:00Z",
            &["room-q", "fb-q", "unknown"],
        )];

        let filter = ReviewFilter {
            category: Some(Category::Room),
            ..Default::default()
        };
        let kept = filter.apply(&reviews, &catalog);
        let ids: Vec<_> = kept[0].answers.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["room-q"]);
    }

    #[test]
    fn test_category_scope_excludes_uncatalogued_ratings() {
        let catalog = Catalog {
            questions: vec![Question {
                id: "room-q".to_string(),
                text: "Bed comfort".to_string(),
                category: Category::Room,
                question_type: QuestionType::Rating,
                order: 0,
            }],
            composites: Vec::new(),
        };
        let mut reviews = vec![review(
            Category::Room,
            "2024-05-05T10:00:00Z",
            &["room-q", "deleted-q"],
        )];
        reviews[0].answers[0].rating = Some(10);
        reviews[0].answers[1].rating = Some(2);

        let filter = ReviewFilter {
            category: Some(Category::Room),
            ..Default::default()
        };
        let scoped = filter.apply(&reviews, &catalog);
        let series =
            crate::analysis::aggregate_overall(&scoped, crate::models::Granularity::Yearly);
        assert_eq!(series.points()[0].value, 10.0);

        // Without a category scope nothing is dropped.
        let all = ReviewFilter::default().apply(&reviews, &catalog);
        assert_eq!(all[0].answers.len(), 2);
    }

    #[test]
    fn test_describe() {
        assert_eq!(ReviewFilter::default().describe(), "all time");
        let filter = ReviewFilter {
            year: Some(2025),
            ..Default::default()
        };
        assert_eq!(filter.describe(), "2025");
    }
}
