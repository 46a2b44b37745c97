//! Markdown and JSON report generation.
//!
//! This module renders the analytics report built in `main` into a
//! Markdown document or pretty-printed JSON.

use crate::config::ReportConfig;
use crate::models::{
    ChartPoint, Comparison, CompositeSection, GuestIssue, GuestInfo, PeriodSeries,
    MonthlyRow, QuestionSection, Report, ReportMetadata, SubmissionStats, TrendRow, YearlyReport,
    YearlyRow, YesNoResponse, YesNoSummary,
};
use anyhow::Result;

/// Width of the text bars drawn next to chart values.
const BAR_WIDTH: usize = 20;

/// Highest possible rating, used to scale bars.
const MAX_RATING: f64 = 10.0;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# GuestPulse Analytics Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_stats_section(&report.stats));

    output.push_str("## Overall Satisfaction\n\n");
    output.push_str(&generate_series_table(&report.overview));

    output.push_str(&generate_composites_section(
        &report.composites,
        options.include_breakdown,
    ));

    if let Some(ref question) = report.question {
        output.push_str(&generate_question_section(question));
    }

    if let Some(ref comparison) = report.comparison {
        output.push_str(&generate_comparison_section(comparison));
    }

    if options.include_trend {
        output.push_str(&generate_trend_section(&report.trend));
    }

    if options.include_yearly {
        output.push_str(&generate_yearly_section(
            report.yearly.as_ref(),
            &report.available_years,
        ));
    }

    if options.include_yes_no {
        output.push_str(&generate_yes_no_section(
            &report.yes_no,
            &report.yes_no_responses,
            options.max_rows,
        ));
    }

    if options.include_issues {
        output.push_str(&generate_issues_section(&report.issues, options.max_rows));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Category:** {}\n", metadata.category.title()));
    match metadata.month {
        Some(month) => section.push_str(&format!(
            "- **Period:** {} ({})\n",
            metadata.period,
            crate::analysis::MONTH_LABELS[month as usize % 12]
        )),
        None => section.push_str(&format!("- **Period:** {}\n", metadata.period)),
    }
    section.push_str(&format!("- **Window:** {}\n", metadata.window));
    section.push_str(&format!(
        "- **Reviews Analyzed:** {}\n",
        metadata.reviews_analyzed
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the stats bar.
fn generate_stats_section(stats: &SubmissionStats) -> String {
    let mut section = String::new();

    section.push_str("## Submissions\n\n");
    section.push_str("All survey categories in the selected window.\n\n");
    section.push_str("| Reviews | Room | F&B | Ratings | Yes/No Answers | With Remarks |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| **{}** | {} | {} | {} | {} | {} |\n\n",
        stats.total_reviews,
        stats.room_reviews,
        stats.fb_reviews,
        stats.rated_answers,
        stats.yes_no_answers,
        stats.with_description
    ));

    section
}

/// Text bar proportional to a 0-10 rating.
fn bar(value: f64) -> String {
    let filled = ((value / MAX_RATING).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Render chart points as a table.
fn generate_points_table(points: &[ChartPoint], label: &str) -> String {
    let mut table = String::new();

    if points.is_empty() {
        table.push_str("*No reviews in this period.*\n\n");
        return table;
    }

    table.push_str(&format!("| {} | Average | |\n", label));
    table.push_str("|:---|---:|:---|\n");
    for point in points {
        table.push_str(&format!(
            "| {} | {:.2} | `{}` |\n",
            point.name,
            point.value,
            bar(point.value)
        ));
    }
    table.push('\n');

    table
}

/// Render a period series as a table.
fn generate_series_table(series: &PeriodSeries) -> String {
    let label = match series {
        PeriodSeries::Yearly(_) => "Scope",
        PeriodSeries::Monthly(_) => "Month",
        PeriodSeries::Weekly(_) => "Week",
    };
    generate_points_table(series.points(), label)
}

/// Generate one subsection per composite.
fn generate_composites_section(composites: &[CompositeSection], include_breakdown: bool) -> String {
    let mut section = String::new();

    section.push_str("## Composites\n\n");

    if composites.is_empty() {
        section.push_str("No composites are defined for this category.\n\n");
        return section;
    }

    for composite in composites {
        section.push_str(&format!("### {}\n\n", composite.name));
        section.push_str(&generate_series_table(&composite.series));

        if include_breakdown && !composite.breakdown.is_empty() {
            section.push_str(&generate_breakdown(&composite.breakdown));
        }
    }

    section
}

/// Per-question breakdown: the first question is featured, the rest follow.
fn generate_breakdown(breakdown: &[ChartPoint]) -> String {
    let mut block = String::new();

    let (featured, rest) = match breakdown.split_first() {
        Some(split) => split,
        None => return block,
    };

    block.push_str(&format!(
        "> **{}**: {:.2} / 10\n\n",
        featured.name, featured.value
    ));

    if !rest.is_empty() {
        block.push_str(&generate_points_table(rest, "Question"));
    }

    block
}

/// Generate the single-question section.
fn generate_question_section(question: &QuestionSection) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Question: {}\n\n", question.text));
    section.push_str(&generate_series_table(&question.series));

    section
}

/// Generate the period comparison section.
fn generate_comparison_section(comparison: &Comparison) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Comparison: {}\n\n", comparison.subject));
    section.push_str(&generate_points_table(
        &[comparison.period_a.clone(), comparison.period_b.clone()],
        "Period",
    ));

    let direction = if comparison.delta > 0.0 {
        "up"
    } else if comparison.delta < 0.0 {
        "down"
    } else {
        "unchanged"
    };
    section.push_str(&format!(
        "**Change:** {:+.2} ({})\n\n",
        comparison.delta, direction
    ));

    section
}

/// Generate the trend table.
fn generate_trend_section(trend: &[TrendRow]) -> String {
    let mut section = String::new();

    section.push_str("## Trend\n\n");

    if trend.is_empty() {
        section.push_str("No ratings recorded in this window.\n\n");
        return section;
    }

    section.push_str("| Period | Average | Ratings |\n");
    section.push_str("|:---|---:|---:|\n");
    for row in trend {
        section.push_str(&format!("| {} | {:.2} | {} |\n", row.key, row.value, row.ratings));
    }
    section.push('\n');

    section
}

/// Monthly average cell; months without ratings read `N/A`.
fn month_cell(value: f64) -> String {
    if value == 0.0 {
        "N/A".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Twelve-month matrix followed by the full-year average and review count.
fn generate_year_matrix(label: &str, monthly: &[MonthlyRow], yearly: &[YearlyRow]) -> String {
    let mut table = String::new();

    table.push_str(&format!(
        "| {} | {} | Year | Reviews |\n",
        label,
        crate::analysis::MONTH_LABELS.join(" | ")
    ));
    table.push_str(&format!("|:---|{}---:|---:|\n", "---:|".repeat(12)));

    for (row, total) in monthly.iter().zip(yearly) {
        let months: Vec<String> = row.averages.iter().map(|v| month_cell(*v)).collect();
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&row.name),
            months.join(" | "),
            month_cell(total.average),
            total.reviews
        ));
    }
    table.push('\n');

    table
}

/// Generate the year-at-a-glance section.
fn generate_yearly_section(yearly: Option<&YearlyReport>, available_years: &[i32]) -> String {
    let mut section = String::new();

    let Some(yearly) = yearly else {
        section.push_str("## Yearly Report\n\n");
        section.push_str("No reviews recorded for this category yet.\n\n");
        return section;
    };

    section.push_str(&format!("## Yearly Report: {}\n\n", yearly.year));
    let years: Vec<String> = available_years.iter().map(|y| y.to_string()).collect();
    section.push_str(&format!("**Years with data:** {}\n\n", years.join(", ")));

    section.push_str("### Questions\n\n");
    if yearly.monthly_questions.is_empty() {
        section.push_str("No rating questions are defined.\n\n");
    } else {
        section.push_str(&generate_year_matrix(
            "Question",
            &yearly.monthly_questions,
            &yearly.yearly_questions,
        ));
    }

    if !yearly.monthly_composites.is_empty() {
        section.push_str("### Composites\n\n");
        section.push_str(&generate_year_matrix(
            "Composite",
            &yearly.monthly_composites,
            &yearly.yearly_composites,
        ));
    }

    section.push_str("### Daily Breakdown\n\n");
    if yearly.daily.is_empty() {
        section.push_str("No ratings recorded this year.\n\n");
    } else {
        section.push_str("| Date | Average | Ratings |\n");
        section.push_str("|:---|---:|---:|\n");
        for day in &yearly.daily {
            section.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                day.key, day.value, day.ratings
            ));
        }
        section.push('\n');
    }

    section
}

/// Format guest contact details.
fn format_guest(guest: Option<&GuestInfo>) -> String {
    let Some(guest) = guest else {
        return "-".to_string();
    };

    let parts: Vec<String> = [
        guest.name.clone(),
        guest.room_number.as_ref().map(|r| format!("Room {}", r)),
        guest.phone.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

/// Escape pipes so free text does not break tables.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate the yes/no section.
fn generate_yes_no_section(
    summary: &[YesNoSummary],
    responses: &[YesNoResponse],
    max_rows: usize,
) -> String {
    let mut section = String::new();

    section.push_str("## Yes/No Questions\n\n");

    if summary.is_empty() {
        section.push_str("No yes/no questions are defined.\n\n");
        return section;
    }

    section.push_str("| Question | Yes | No | Yes % |\n");
    section.push_str("|:---|:---:|:---:|---:|\n");
    for row in summary {
        section.push_str(&format!(
            "| {} | {} | {} | {:.2}% |\n",
            cell(&row.question_text),
            row.yes,
            row.no,
            row.yes_share
        ));
    }
    section.push('\n');

    if !responses.is_empty() {
        section.push_str("### Latest Responses\n\n");
        section.push_str("| Date | Guest | Answers | Remark |\n");
        section.push_str("|:---|:---|:---|:---|\n");
        for response in responses.iter().take(max_rows) {
            let answers: Vec<String> = response
                .answers
                .iter()
                .map(|(text, yes)| format!("{}: {}", text, if *yes { "Yes" } else { "No" }))
                .collect();
            section.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                response.submitted_at.format("%Y-%m-%d %H:%M"),
                cell(&format_guest(response.guest.as_ref())),
                cell(&answers.join("; ")),
                cell(response.description.as_deref().unwrap_or("-"))
            ));
        }
        if responses.len() > max_rows {
            section.push_str(&format!("\n*{} more not shown.*\n", responses.len() - max_rows));
        }
        section.push('\n');
    }

    section
}

/// Generate the guest remarks section.
fn generate_issues_section(issues: &[GuestIssue], max_rows: usize) -> String {
    let mut section = String::new();

    section.push_str("## Guest Remarks\n\n");

    if issues.is_empty() {
        section.push_str("No remarks were left in this window.\n\n");
        return section;
    }

    for issue in issues.iter().take(max_rows) {
        section.push_str(&format!(
            "- **{}** ({}, {}): {}\n",
            issue.submitted_at.format("%Y-%m-%d %H:%M"),
            issue.category.title(),
            format_guest(issue.guest.as_ref()),
            issue.description
        ));
    }
    if issues.len() > max_rows {
        section.push_str(&format!("\n*{} more not shown.*\n", issues.len() - max_rows));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by GuestPulse*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Period};
    use chrono::{DateTime, Utc};

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            category: Category::Room,
            period: Period::Weekly,
            month: Some(0),
            year: Some(2024),
            window: "2024".to_string(),
            reviews_analyzed: 2,
            duration_seconds: 0.01,
        };

        let submitted_at = DateTime::parse_from_rfc3339("2024-01-10T09:30:00+03:00").unwrap();

        Report {
            metadata,
            overview: PeriodSeries::Weekly(vec![
                ChartPoint::new("W1", 4.0),
                ChartPoint::new("W2", 6.0),
            ]),
            composites: vec![CompositeSection {
                id: "c1".to_string(),
                name: "Cleanliness".to_string(),
                series: PeriodSeries::Weekly(vec![ChartPoint::new("W1", 7.5)]),
                breakdown: vec![
                    ChartPoint::new("Bathroom", 8.0),
                    ChartPoint::new("Bedding", 7.0),
                ],
            }],
            question: None,
            comparison: Some(Comparison {
                subject: "Overall satisfaction".to_string(),
                period_a: ChartPoint::new("Period A (2024-01-01 to 2024-01-07)", 4.0),
                period_b: ChartPoint::new("Period B (2024-01-08 to 2024-01-14)", 6.0),
                delta: 2.0,
            }),
            trend: vec![TrendRow {
                key: "2024-01".to_string(),
                value: 5.0,
                ratings: 2,
            }],
            available_years: vec![2023, 2024],
            yearly: Some(YearlyReport {
                year: 2024,
                monthly_questions: vec![MonthlyRow {
                    id: "bath".to_string(),
                    name: "Bathroom".to_string(),
                    averages: [8.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 6.5],
                }],
                yearly_questions: vec![YearlyRow {
                    id: "bath".to_string(),
                    name: "Bathroom".to_string(),
                    average: 7.25,
                    reviews: 4,
                }],
                monthly_composites: Vec::new(),
                yearly_composites: Vec::new(),
                daily: vec![TrendRow {
                    key: "2024-01-10".to_string(),
                    value: 8.0,
                    ratings: 1,
                }],
            }),
            stats: SubmissionStats {
                total_reviews: 2,
                room_reviews: 2,
                rated_answers: 2,
                with_description: 1,
                ..Default::default()
            },
            yes_no: vec![YesNoSummary {
                question_id: "recommend".to_string(),
                question_text: "Would you recommend us?".to_string(),
                yes: 1,
                no: 0,
                yes_share: 100.0,
            }],
            yes_no_responses: Vec::new(),
            issues: vec![GuestIssue {
                review_id: "r1".to_string(),
                submitted_at,
                category: Category::Room,
                description: "Shower drain | blocked".to_string(),
                guest: Some(GuestInfo {
                    name: Some("Ayaan".to_string()),
                    phone: None,
                    room_number: Some("502".to_string()),
                }),
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# GuestPulse Analytics Report"));
        assert!(markdown.contains("- **Period:** Weekly (Jan)"));
        assert!(markdown.contains("| W2 | 6.00 |"));
        assert!(markdown.contains("### Cleanliness"));
        assert!(markdown.contains("> **Bathroom**: 8.00 / 10"));
        assert!(markdown.contains("| Bedding | 7.00 |"));
        assert!(markdown.contains("**Change:** +2.00 (up)"));
        assert!(markdown.contains("| 2024-01 | 5.00 | 2 |"));
        assert!(markdown.contains("Ayaan, Room 502"));
    }

    #[test]
    fn test_sections_can_be_disabled() {
        let report = create_test_report();
        let options = ReportConfig {
            include_breakdown: false,
            include_trend: false,
            trend: crate::analysis::RollupPeriod::Monthly,
            include_yearly: false,
            include_yes_no: false,
            include_issues: false,
            max_rows: 10,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("Bathroom"));
        assert!(!markdown.contains("## Trend"));
        assert!(!markdown.contains("## Yearly Report"));
        assert!(!markdown.contains("## Yes/No Questions"));
        assert!(!markdown.contains("## Guest Remarks"));
    }

    #[test]
    fn test_yearly_section() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("## Yearly Report: 2024"));
        assert!(markdown.contains("**Years with data:** 2023, 2024"));
        assert!(markdown.contains("| Question | Jan | Feb |"));
        assert!(markdown.contains("| Bathroom | 8.00 | N/A |"));
        assert!(markdown.contains("| N/A | 6.50 | 7.25 | 4 |"));
        assert!(markdown.contains("| 2024-01-10 | 8.00 | 1 |"));
        assert!(!markdown.contains("### Composites\n\n| Composite"));

        let empty = generate_yearly_section(None, &[]);
        assert!(empty.contains("No reviews recorded"));
    }

    #[test]
    fn test_empty_weekly_series() {
        let table = generate_series_table(&PeriodSeries::Weekly(Vec::new()));
        assert!(table.contains("No reviews in this period"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(5.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_issue_rows_truncate() {
        let report = create_test_report();
        let mut issues = report.issues.clone();
        issues.push(issues[0].clone());

        let section = generate_issues_section(&issues, 1);
        assert!(section.contains("1 more not shown"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"overview\""));
        assert!(json.contains("\"period\": \"weekly\""));
        assert!(json.contains("\"composites\""));
        assert!(!json.contains("\"question\""));
    }
}
