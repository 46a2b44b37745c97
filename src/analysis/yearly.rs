//! Year-at-a-glance report.
//!
//! Per-question and per-composite averages for every month of one calendar
//! year, the full-year averages with review counts, and a daily breakdown.

use super::aggregator::{aggregate_composite, aggregate_question};
use super::rollup::rollup;
use crate::models::{
    Catalog, Category, Granularity, MonthlyRow, PeriodSeries, QuestionType, Review, YearlyReport,
    YearlyRow,
};
use chrono::Datelike;
use std::collections::BTreeSet;

/// Calendar years that have at least one review, ascending.
pub fn available_years(reviews: &[Review]) -> Vec<i32> {
    reviews
        .iter()
        .map(|r| r.date().year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn monthly_values(series: &PeriodSeries) -> [f64; 12] {
    let points = series.points();
    std::array::from_fn(|i| points.get(i).map_or(0.0, |p| p.value))
}

fn yearly_value(series: &PeriodSeries) -> f64 {
    series.points().first().map_or(0.0, |p| p.value)
}

/// Reviews with a rating for any question accepted by `include`.
fn rated_reviews<F>(reviews: &[Review], include: F) -> usize
where
    F: Fn(&str) -> bool,
{
    reviews
        .iter()
        .filter(|r| {
            r.answers
                .iter()
                .any(|a| a.rating.is_some() && include(&a.question_id))
        })
        .count()
}

/// Build the report for `year` from a category-scoped snapshot.
///
/// Rows cover every rating question and every composite of `category`, in
/// catalog order, including those with no ratings that year.
pub fn yearly_report(
    reviews: &[Review],
    catalog: &Catalog,
    category: Category,
    year: i32,
) -> YearlyReport {
    let in_year: Vec<Review> = reviews
        .iter()
        .filter(|r| r.date().year() == year)
        .cloned()
        .collect();

    let questions = catalog.questions_for(category, QuestionType::Rating);
    let composites = catalog.composites_for(category);

    let mut report = YearlyReport {
        year,
        monthly_questions: Vec::with_capacity(questions.len()),
        yearly_questions: Vec::with_capacity(questions.len()),
        monthly_composites: Vec::with_capacity(composites.len()),
        yearly_composites: Vec::with_capacity(composites.len()),
        daily: rollup(&in_year).daily,
    };

    for question in questions {
        let monthly = aggregate_question(&in_year, &question.id, Granularity::Monthly);
        let yearly = aggregate_question(&in_year, &question.id, Granularity::Yearly);
        report.monthly_questions.push(MonthlyRow {
            id: question.id.clone(),
            name: question.text.clone(),
            averages: monthly_values(&monthly),
        });
        report.yearly_questions.push(YearlyRow {
            id: question.id.clone(),
            name: question.text.clone(),
            average: yearly_value(&yearly),
            reviews: rated_reviews(&in_year, |id| id == question.id),
        });
    }

    for composite in composites {
        let monthly = aggregate_composite(&in_year, composite, Granularity::Monthly);
        let yearly = aggregate_composite(&in_year, composite, Granularity::Yearly);
        report.monthly_composites.push(MonthlyRow {
            id: composite.id.clone(),
            name: composite.name.clone(),
            averages: monthly_values(&monthly),
        });
        report.yearly_composites.push(YearlyRow {
            id: composite.id.clone(),
            name: composite.name.clone(),
            average: yearly_value(&yearly),
            reviews: rated_reviews(&in_year, |id| composite.questions.iter().any(|q| q == id)),
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, Composite, Question};
    use chrono::DateTime;

    fn review(timestamp: &str, answers: &[(&str, u8)]) -> Review {
        Review {
            id: timestamp.to_string(),
            submitted_at: DateTime::parse_from_rfc3339(timestamp).unwrap(),
            category: Category::Room,
            answers: answers
                .iter()
                .map(|(q, r)| Answer {
                    question_id: q.to_string(),
                    rating: Some(*r),
                    answer_boolean: None,
                })
                .collect(),
            description: None,
            room_guest_info: None,
        }
    }

    fn question(id: &str, kind: QuestionType, order: u32) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Text {}", id),
            category: Category::Room,
            question_type: kind,
            order,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            questions: vec![
                question("bed", QuestionType::Rating, 2),
                question("clean", QuestionType::Rating, 1),
                question("again", QuestionType::YesNo, 3),
            ],
            composites: vec![Composite {
                id: "stay".to_string(),
                name: "Stay".to_string(),
                category: Category::Room,
                questions: vec!["clean".to_string(), "bed".to_string()],
                order: 0,
            }],
        }
    }

    #[test]
    fn test_available_years() {
        let reviews = vec![
            review("2024-03-01T10:00:00Z", &[]),
            review("2022-07-01T10:00:00Z", &[]),
            review("2024-01-01T10:00:00Z", &[]),
        ];
        assert_eq!(available_years(&reviews), vec![2022, 2024]);
        assert!(available_years(&[]).is_empty());
    }

    #[test]
    fn test_yearly_report_matrix() {
        let reviews = vec![
            review("2024-01-10T10:00:00Z", &[("clean", 8), ("bed", 6)]),
            review("2024-01-20T10:00:00Z", &[("clean", 10)]),
            review("2024-03-05T10:00:00Z", &[("bed", 9)]),
            review("2023-01-10T10:00:00Z", &[("clean", 1)]),
        ];

        let report = yearly_report(&reviews, &catalog(), Category::Room, 2024);
        assert_eq!(report.year, 2024);

        // Rating questions only, in catalog order.
        let ids: Vec<_> = report.monthly_questions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["clean", "bed"]);

        let clean = &report.monthly_questions[0];
        assert_eq!(clean.averages[0], 9.0);
        assert_eq!(clean.averages[2], 0.0);
        assert_eq!(report.yearly_questions[0].average, 9.0);
        assert_eq!(report.yearly_questions[0].reviews, 2);
        assert_eq!(report.yearly_questions[1].average, 7.5);
        assert_eq!(report.yearly_questions[1].reviews, 2);

        let stay = &report.monthly_composites[0];
        assert_eq!(stay.averages[0], 8.0);
        assert_eq!(stay.averages[2], 9.0);
        assert_eq!(report.yearly_composites[0].average, 8.25);
        assert_eq!(report.yearly_composites[0].reviews, 3);

        let days: Vec<_> = report.daily.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(days, vec!["2024-01-10", "2024-01-20", "2024-03-05"]);
    }

    #[test]
    fn test_yearly_report_without_data() {
        let report = yearly_report(&[], &catalog(), Category::Room, 2030);
        assert_eq!(report.yearly_questions.len(), 2);
        assert!(report.yearly_questions.iter().all(|r| r.average == 0.0 && r.reviews == 0));
        assert!(report.daily.is_empty());
    }
}
