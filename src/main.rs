//! GuestPulse - guest-feedback analytics for hotel satisfaction surveys
//!
//! A CLI tool that reads exported reviews and the survey catalog,
//! aggregates ratings by period, composite and question, and writes
//! a Markdown or JSON analytics report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable data, invalid catalog, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use analysis::{
    aggregate_composite, aggregate_overall, aggregate_question, aggregate_question_breakdown,
    compare_periods, ReviewFilter, Subject,
};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{
    Catalog, Category, Composite, CompositeSection, Granularity, QuestionSection, Report,
    ReportMetadata, Review,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config can turn on verbose logging, so it is read first.
    let (config, source) = match prepare_config(&args) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("GuestPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run(args, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .guestpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the category, period, year and report sections.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
///
/// Returns the config and the file it came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default()? {
        Some(config) => Ok((config, Some(PathBuf::from(CONFIG_FILE)))),
        None => Ok((Config::default(), None)),
    }
}

/// Load the config, apply CLI overrides and validate the result.
fn prepare_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;
    Ok((config, source))
}

/// Run the complete analysis workflow.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let reviews_path = args
        .reviews
        .clone()
        .ok_or_else(|| anyhow!("--reviews is required"))?;
    let catalog_path = args
        .catalog
        .clone()
        .ok_or_else(|| anyhow!("--catalog is required"))?;

    // Step 1: Load the catalog and the review snapshot together
    println!("📥 Loading reviews from {}", reviews_path.display());
    let (catalog, reviews) = tokio::try_join!(
        dataset::load_catalog(&catalog_path),
        dataset::load_reviews(&reviews_path),
    )
    .context("Failed to load survey data")?;

    // Step 2: Scope the snapshot
    let filter = ReviewFilter {
        category: Some(config.analytics.category),
        year: config.analytics.year,
        range: args.range,
    };
    let scoped = filter.apply(&reviews, &catalog);
    info!(
        "{} of {} reviews in scope ({}, {})",
        scoped.len(),
        reviews.len(),
        config.analytics.category,
        filter.describe()
    );
    if scoped.is_empty() {
        warn!("No reviews match the selected category and window");
    }

    // Step 3: Aggregate
    println!("🔬 Aggregating {} reviews...", scoped.len());
    let report = build_report(&args, &config, &catalog, &reviews, &scoped, &filter)?;

    // Step 4: Render and save
    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    print_summary(&report, start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// The configured headline composite, when it exists in `category`.
fn headline_composite<'a>(
    catalog: &'a Catalog,
    wanted: Option<&str>,
    category: Category,
) -> Option<&'a Composite> {
    let wanted = wanted?;
    match catalog.composite(wanted) {
        Some(composite) if composite.category == category => Some(composite),
        Some(composite) => {
            debug!(
                "Overall composite '{}' is a {} composite, using all ratings",
                composite.name, composite.category
            );
            None
        }
        None => {
            warn!("Overall composite '{}' not found, using all ratings", wanted);
            None
        }
    }
}

/// Composites to report: the requested one, or every composite of the
/// category except the headline.
fn select_composites<'a>(
    catalog: &'a Catalog,
    category: Category,
    wanted: Option<&str>,
    headline: Option<&Composite>,
) -> Result<Vec<&'a Composite>> {
    let Some(wanted) = wanted else {
        return Ok(catalog
            .composites_for(category)
            .into_iter()
            .filter(|c| headline.map_or(true, |h| h.id != c.id))
            .collect());
    };

    let composite = catalog
        .composite(wanted)
        .ok_or_else(|| anyhow!("Unknown composite: {}", wanted))?;
    if composite.category != category {
        return Err(anyhow!(
            "Composite '{}' belongs to category {}, not {}",
            composite.name,
            composite.category,
            category
        ));
    }
    Ok(vec![composite])
}

/// Assemble every report section from the scoped snapshot.
fn build_report(
    args: &Args,
    config: &Config,
    catalog: &Catalog,
    all_reviews: &[Review],
    scoped: &[Review],
    filter: &ReviewFilter,
) -> Result<Report> {
    let started = Instant::now();
    let category = config.analytics.category;
    let granularity = Granularity::from_period(config.analytics.period, config.month0());
    debug!("Granularity: {:?}", granularity);

    let category_only = ReviewFilter {
        category: Some(category),
        ..Default::default()
    }
    .apply(all_reviews, catalog);

    // Headline series: the configured "overall" composite, or every rating.
    let headline = headline_composite(
        catalog,
        config.analytics.overall_composite.as_deref(),
        category,
    );
    let overview = match headline {
        Some(composite) => aggregate_composite(scoped, composite, granularity),
        None => aggregate_overall(scoped, granularity),
    };
    debug!("Headline series has {} buckets", overview.len());

    let selected = select_composites(catalog, category, args.composite.as_deref(), headline)?;

    let composites: Vec<CompositeSection> = selected
        .into_iter()
        .map(|composite| {
            debug!("Aggregating composite {}", composite.name);
            CompositeSection {
                id: composite.id.clone(),
                name: composite.name.clone(),
                series: aggregate_composite(scoped, composite, granularity),
                breakdown: aggregate_question_breakdown(scoped, composite, catalog),
            }
        })
        .collect();

    let question = match args.question.as_deref() {
        Some(id) => {
            let question = catalog
                .question(id)
                .ok_or_else(|| anyhow!("Unknown question: {}", id))?;
            Some(QuestionSection {
                id: question.id.clone(),
                text: question.text.clone(),
                series: aggregate_question(scoped, &question.id, granularity),
            })
        }
        None => None,
    };

    // Comparison ranges are independent of the year/range window.
    let comparison = match (args.compare_a, args.compare_b) {
        (Some(range_a), Some(range_b)) => {
            let subject = match (&question, composites.as_slice()) {
                (Some(q), _) => Subject::Question {
                    id: &q.id,
                    text: &q.text,
                },
                (None, [only]) if args.composite.is_some() => catalog
                    .composite(&only.id)
                    .map(Subject::Composite)
                    .unwrap_or(Subject::Overall),
                _ => Subject::Overall,
            };
            Some(compare_periods(&category_only, subject, &range_a, &range_b))
        }
        _ => None,
    };

    let trend = analysis::rollup(scoped).select(config.report.trend);

    // The yearly report covers the configured year, else the latest with data.
    let available_years = analysis::available_years(&category_only);
    let yearly = if config.report.include_yearly {
        config
            .analytics
            .year
            .or_else(|| available_years.last().copied())
            .map(|year| analysis::yearly_report(&category_only, catalog, category, year))
    } else {
        None
    };

    // Submission counts span both categories of the window.
    let window = ReviewFilter {
        category: None,
        ..filter.clone()
    }
    .apply(all_reviews, catalog);

    Ok(Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            category,
            period: config.analytics.period,
            month: match granularity {
                Granularity::Weekly { month } => Some(month),
                _ => None,
            },
            year: config.analytics.year,
            window: filter.describe(),
            reviews_analyzed: scoped.len(),
            duration_seconds: started.elapsed().as_secs_f64(),
        },
        overview,
        composites,
        question,
        comparison,
        trend,
        available_years,
        yearly,
        stats: analysis::submission_stats(&window),
        yes_no: analysis::yes_no_summary(scoped, catalog, category),
        yes_no_responses: analysis::yes_no_responses(scoped, catalog),
        issues: analysis::guest_issues(scoped),
    })
}

/// Print a short console summary.
fn print_summary(report: &Report, duration: f64) {
    println!("\n📊 Analysis Summary:");
    println!("   Category: {}", report.metadata.category.title());
    println!("   Window: {}", report.metadata.window);
    println!("   Reviews: {}", report.metadata.reviews_analyzed);
    for point in report.overview.points() {
        println!("   - {}: {:.2}", point.name, point.value);
    }
    println!("   Composites: {}", report.composites.len());
    if let Some(ref comparison) = report.comparison {
        println!(
            "   Comparison ({}): {:.2} -> {:.2} ({:+.2})",
            comparison.subject,
            comparison.period_a.value,
            comparison.period_b.value,
            comparison.delta
        );
    }
    if let Some(ref yearly) = report.yearly {
        println!(
            "   Yearly report: {} ({} questions)",
            yearly.year,
            yearly.yearly_questions.len()
        );
    }
    println!("   Guest remarks: {}", report.issues.len());
    println!("   Duration: {:.2}s", duration);
}
