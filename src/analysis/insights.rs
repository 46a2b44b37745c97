//! Submission counters, yes/no tallies, and guest remarks.

use super::aggregator::round2;
use crate::models::{
    Catalog, Category, GuestIssue, QuestionType, Review, SubmissionStats, YesNoResponse,
    YesNoSummary,
};

/// Count submissions and answers in the snapshot.
pub fn submission_stats(reviews: &[Review]) -> SubmissionStats {
    let mut stats = SubmissionStats {
        total_reviews: reviews.len(),
        ..Default::default()
    };

    for review in reviews {
        match review.category {
            Category::Room => stats.room_reviews += 1,
            Category::FoodAndBeverage => stats.fb_reviews += 1,
        }
        stats.rated_answers += review.answers.iter().filter(|a| a.rating.is_some()).count();
        stats.yes_no_answers += review
            .answers
            .iter()
            .filter(|a| a.answer_boolean.is_some())
            .count();
        if review.note().is_some() {
            stats.with_description += 1;
        }
    }

    stats
}

/// Yes/no tallies per question of `category`, in catalog order.
///
/// Questions nobody answered are still listed with a zero share.
pub fn yes_no_summary(
    reviews: &[Review],
    catalog: &Catalog,
    category: Category,
) -> Vec<YesNoSummary> {
    catalog
        .questions_for(category, QuestionType::YesNo)
        .into_iter()
        .map(|question| {
            let (mut yes, mut no) = (0usize, 0usize);
            for answer in reviews
                .iter()
                .flat_map(|r| &r.answers)
                .filter(|a| a.question_id == question.id)
            {
                match answer.answer_boolean {
                    Some(true) => yes += 1,
                    Some(false) => no += 1,
                    None => {}
                }
            }
            let total = yes + no;
            YesNoSummary {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                yes,
                no,
                yes_share: if total == 0 {
                    0.0
                } else {
                    round2(yes as f64 * 100.0 / total as f64)
                },
            }
        })
        .collect()
}

/// Reviews carrying yes/no answers, newest first.
pub fn yes_no_responses(reviews: &[Review], catalog: &Catalog) -> Vec<YesNoResponse> {
    let mut responses: Vec<YesNoResponse> = reviews
        .iter()
        .filter_map(|review| {
            let answers: Vec<(String, bool)> = review
                .answers
                .iter()
                .filter_map(|a| {
                    a.answer_boolean
                        .map(|value| (catalog.question_text(&a.question_id).to_string(), value))
                })
                .collect();
            if answers.is_empty() {
                return None;
            }
            Some(YesNoResponse {
                review_id: review.id.clone(),
                submitted_at: review.submitted_at,
                description: review.note().map(str::to_string),
                guest: review.room_guest_info.clone(),
                answers,
            })
        })
        .collect();

    responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    responses
}

/// Reviews that left a written remark, newest first.
pub fn guest_issues(reviews: &[Review]) -> Vec<GuestIssue> {
    let mut issues: Vec<GuestIssue> = reviews
        .iter()
        .filter_map(|review| {
            review.note().map(|note| GuestIssue {
                review_id: review.id.clone(),
                submitted_at: review.submitted_at,
                category: review.category,
                description: note.to_string(),
                guest: review.room_guest_info.clone(),
            })
        })
        .collect();

    issues.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    issues
}
