//! Data models for guest-feedback analytics.
//!
//! This module contains the survey catalog (questions and composites),
//! submitted reviews, the chart-ready aggregation output, and the report
//! structures built from them.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Survey category a question, composite, or review belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Room stay feedback.
    #[serde(rename = "room")]
    Room,
    /// Food & beverage feedback.
    #[serde(rename = "f&b")]
    FoodAndBeverage,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Room => write!(f, "room"),
            Category::FoodAndBeverage => write!(f, "f&b"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "room" | "rooms" => Ok(Category::Room),
            "f&b" | "fb" | "food" | "food&beverage" => Ok(Category::FoodAndBeverage),
            other => Err(format!("unknown category '{}' (expected room or f&b)", other)),
        }
    }
}

impl Category {
    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Room => "Room",
            Category::FoodAndBeverage => "Food & Beverage",
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Numeric rating from 1 to 10.
    Rating,
    /// Boolean yes/no answer.
    YesNo,
}

/// A survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub question_type: QuestionType,
    #[serde(default)]
    pub order: u32,
}

/// A named group of same-category questions scored together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composite {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Member question ids, in display order.
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub order: u32,
}

/// Questions and composites known to the survey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub composites: Vec<Composite>,
}

impl Catalog {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Look up a composite by id, falling back to a case-insensitive name match.
    pub fn composite(&self, id_or_name: &str) -> Option<&Composite> {
        self.composites
            .iter()
            .find(|c| c.id == id_or_name)
            .or_else(|| {
                self.composites
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(id_or_name))
            })
    }

    /// Composites of a category, sorted by display order.
    pub fn composites_for(&self, category: Category) -> Vec<&Composite> {
        let mut composites: Vec<&Composite> = self
            .composites
            .iter()
            .filter(|c| c.category == category)
            .collect();
        composites.sort_by_key(|c| c.order);
        composites
    }

    /// Questions of a category and type, sorted by display order.
    pub fn questions_for(&self, category: Category, kind: QuestionType) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| q.category == category && q.question_type == kind)
            .collect();
        questions.sort_by_key(|q| q.order);
        questions
    }

    /// Display text for a question id, or the id itself when unknown.
    pub fn question_text<'a>(&'a self, id: &'a str) -> &'a str {
        self.question(id).map(|q| q.text.as_str()).unwrap_or(id)
    }
}

/// One answer inside a review. Exactly one of `rating` / `answer_boolean`
/// is populated, depending on the question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_boolean: Option<bool>,
}

/// Contact details a room guest may leave with a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
}

/// A submitted survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    /// Submission time; calendar buckets use the offset it was recorded in.
    pub submitted_at: DateTime<FixedOffset>,
    pub category: Category,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_guest_info: Option<GuestInfo>,
}

impl Review {
    /// Calendar date of submission.
    pub fn date(&self) -> NaiveDate {
        self.submitted_at.date_naive()
    }

    /// Zero-based month of submission.
    pub fn month0(&self) -> u32 {
        self.submitted_at.month0()
    }

    /// Ratings given in this review, skipping yes/no answers.
    pub fn ratings(&self) -> impl Iterator<Item = u8> + '_ {
        self.answers.iter().filter_map(|a| a.rating)
    }

    /// Trimmed free-text description, if any.
    pub fn note(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// A single `{ name, value }` chart bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Reporting period selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Yearly,
    #[default]
    Monthly,
    Weekly,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Yearly => write!(f, "Yearly"),
            Period::Monthly => write!(f, "Monthly"),
            Period::Weekly => write!(f, "Weekly"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yearly" | "year" => Ok(Period::Yearly),
            "monthly" | "month" => Ok(Period::Monthly),
            "weekly" | "week" => Ok(Period::Weekly),
            other => Err(format!(
                "unknown period '{}' (expected yearly, monthly or weekly)",
                other
            )),
        }
    }
}

/// Grouping directive for the aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// A single bucket over the whole snapshot.
    Yearly,
    /// Twelve calendar-month buckets.
    Monthly,
    /// Week-of-month buckets within one zero-based month.
    Weekly { month: u32 },
}

impl Granularity {
    /// Build a granularity from a period and a zero-based month.
    pub fn from_period(period: Period, month0: u32) -> Self {
        match period {
            Period::Yearly => Granularity::Yearly,
            Period::Monthly => Granularity::Monthly,
            Period::Weekly => Granularity::Weekly { month: month0 },
        }
    }
}

/// Aggregation output, one variant per granularity so the bucket shape is
/// visible in the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "period", content = "points", rename_all = "lowercase")]
pub enum PeriodSeries {
    Yearly(ChartPoint),
    Monthly([ChartPoint; 12]),
    Weekly(Vec<ChartPoint>),
}

impl PeriodSeries {
    /// Buckets in chart order.
    pub fn points(&self) -> &[ChartPoint] {
        match self {
            PeriodSeries::Yearly(point) => std::slice::from_ref(point),
            PeriodSeries::Monthly(points) => points,
            PeriodSeries::Weekly(points) => points,
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.points().len()
    }

    /// True for a weekly series with no reviewed weeks.
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// Chart series for one composite plus its per-question breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeSection {
    pub id: String,
    pub name: String,
    pub series: PeriodSeries,
    /// Per-question averages in composite order; the first entry is featured.
    pub breakdown: Vec<ChartPoint>,
}

/// Chart series for a single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSection {
    pub id: String,
    pub text: String,
    pub series: PeriodSeries,
}

/// Two-range comparison of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// What was compared (overall, a composite, or a question).
    pub subject: String,
    pub period_a: ChartPoint,
    pub period_b: ChartPoint,
    /// `period_b - period_a`, rounded to two decimals.
    pub delta: f64,
}

/// Keyed average for one rollup period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub key: String,
    pub value: f64,
    pub ratings: usize,
}

/// Submission counters for the dashboard stats bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStats {
    pub total_reviews: usize,
    pub room_reviews: usize,
    pub fb_reviews: usize,
    pub rated_answers: usize,
    pub yes_no_answers: usize,
    pub with_description: usize,
}

/// Yes/no tallies for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoSummary {
    pub question_id: String,
    pub question_text: String,
    pub yes: usize,
    pub no: usize,
    /// Share of "yes" answers as a percentage.
    pub yes_share: f64,
}

/// A review's yes/no answers with resolved question texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoResponse {
    pub review_id: String,
    pub submitted_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestInfo>,
    pub answers: Vec<(String, bool)>,
}

/// A review that left a free-text remark for staff follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestIssue {
    pub review_id: String,
    pub submitted_at: DateTime<FixedOffset>,
    pub category: Category,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestInfo>,
}

/// Twelve monthly averages for one question or composite. Zero means no ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub id: String,
    pub name: String,
    pub averages: [f64; 12],
}

/// Full-year average for one question or composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
    pub id: String,
    pub name: String,
    pub average: f64,
    /// Reviews that rated at least one of the row's questions.
    pub reviews: usize,
}

/// Year-at-a-glance report for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: i32,
    pub monthly_questions: Vec<MonthlyRow>,
    pub yearly_questions: Vec<YearlyRow>,
    pub monthly_composites: Vec<MonthlyRow>,
    pub yearly_composites: Vec<YearlyRow>,
    /// Overall average per day that has ratings.
    pub daily: Vec<TrendRow>,
}

/// Metadata about the analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub category: Category,
    pub period: Period,
    /// Zero-based month used for weekly grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Human-readable description of the date window.
    pub window: String,
    pub reviews_analyzed: usize,
    pub duration_seconds: f64,
}

/// The complete analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Headline series (overall satisfaction).
    pub overview: PeriodSeries,
    pub composites: Vec<CompositeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    pub trend: Vec<TrendRow>,
    /// Calendar years with at least one review in the category, ascending.
    pub available_years: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly: Option<YearlyReport>,
    pub stats: SubmissionStats,
    pub yes_no: Vec<YesNoSummary>,
    pub yes_no_responses: Vec<YesNoResponse>,
    pub issues: Vec<GuestIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("room".parse::<Category>(), Ok(Category::Room));
        assert_eq!("F&B".parse::<Category>(), Ok(Category::FoodAndBeverage));
        assert_eq!("fb".parse::<Category>(), Ok(Category::FoodAndBeverage));
        assert!("spa".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::FoodAndBeverage).unwrap();
        assert_eq!(json, "\"f&b\"");
        let parsed: Category = serde_json::from_str("\"room\"").unwrap();
        assert_eq!(parsed, Category::Room);
    }

    #[test]
    fn test_review_deserializes_camel_case() {
        let json = r#"{
            "id": "r1",
            "submittedAt": "2024-03-09T22:15:00+03:00",
            "category": "room",
            "answers": [
                { "questionId": "q1", "rating": 9 },
                { "questionId": "q2", "answerBoolean": true }
            ],
            "description": "  ",
            "roomGuestInfo": { "name": "Amal", "roomNumber": "214" }
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(review.month0(), 2);
        assert_eq!(review.ratings().collect::<Vec<_>>(), vec![9]);
        assert_eq!(review.note(), None);
        assert_eq!(
            review.room_guest_info.unwrap().room_number.as_deref(),
            Some("214")
        );
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = Catalog {
            questions: vec![
                Question {
                    id: "q2".to_string(),
                    text: "Cleanliness".to_string(),
                    category: Category::Room,
                    question_type: QuestionType::Rating,
                    order: 2,
                },
                Question {
                    id: "q1".to_string(),
                    text: "Check-in".to_string(),
                    category: Category::Room,
                    question_type: QuestionType::Rating,
                    order: 1,
                },
            ],
            composites: vec![Composite {
                id: "c1".to_string(),
                name: "Stay".to_string(),
                category: Category::Room,
                questions: vec!["q2".to_string(), "q1".to_string()],
                order: 0,
            }],
        };

        assert_eq!(catalog.composite("c1").map(|c| c.name.as_str()), Some("Stay"));
        assert_eq!(catalog.composite("stay").map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(catalog.question_text("q9"), "q9");

        let ordered: Vec<_> = catalog
            .questions_for(Category::Room, QuestionType::Rating)
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["q1", "q2"]);
    }

    #[test]
    fn test_period_series_points() {
        let yearly = PeriodSeries::Yearly(ChartPoint::new("Overall", 7.5));
        assert_eq!(yearly.len(), 1);
        assert_eq!(yearly.points()[0].name, "Overall");

        assert!(!yearly.is_empty());

        let weekly = PeriodSeries::Weekly(Vec::new());
        assert_eq!(weekly.len(), 0);
        assert!(weekly.is_empty());
    }

    #[test]
    fn test_granularity_from_period() {
        assert_eq!(Granularity::from_period(Period::Yearly, 4), Granularity::Yearly);
        assert_eq!(
            Granularity::from_period(Period::Weekly, 4),
            Granularity::Weekly { month: 4 }
        );
    }
}
