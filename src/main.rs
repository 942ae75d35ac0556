//! Ingrevo Survey - survey results reporting
//!
//! A CLI tool that aggregates exported survey responses per question
//! and writes Markdown, JSON or CSV result reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing files, unparseable documents, write failure)

use anyhow::{Context, Result};
use ingrevo_survey::analysis::{sort_newest_first, ResponseFilter};
use ingrevo_survey::catalog::{CatalogStats, SurveyQuery};
use ingrevo_survey::cli::{Args, OutputFormat, StatusFilter};
use ingrevo_survey::config::{Config, CONFIG_FILE_NAME};
use ingrevo_survey::models::{Response, Survey, SurveyStatus};
use ingrevo_survey::report::{self, Report};
use ingrevo_survey::store::{self, LoadOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
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

    // Config is read before logging starts so its verbose setting applies
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("Ingrevo Survey v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ingrevo.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the output, text previews, timeline and export.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` wins when set.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
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

/// Run the selected workflow. Returns the exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    if let Some(ref catalog_path) = args.catalog {
        return handle_catalog(catalog_path, &args);
    }

    let survey_path = args
        .survey
        .as_deref()
        .context("A survey document is required (--survey)")?;

    // Step 1: Load the survey schema
    println!("📥 Loading survey: {}", survey_path.display());
    let survey = store::load_survey(survey_path)?;

    if let Err(errors) = survey.validate() {
        for e in &errors {
            warn!("Schema problem: {}", e);
        }
        println!(
            "   ⚠️  {} schema problems found (see log); aggregating anyway",
            errors.len()
        );
    }

    // Step 2: Load and filter the responses
    let responses = load_responses(&args)?;
    let loaded = responses.len();

    let filter = ResponseFilter {
        survey_id: survey.id.clone(),
        role: args.role.clone(),
        from: args.from,
        to: args.to,
    };
    let mut responses = filter.apply(responses);
    sort_newest_first(&mut responses);

    if responses.len() != loaded {
        info!("{} of {} responses match the filters", responses.len(), loaded);
    }
    println!("   Responses: {} (of {} loaded)", responses.len(), loaded);

    if args.dry_run {
        return handle_dry_run(&survey, &responses);
    }

    // Step 3: Build and write the report
    println!("\n📝 Generating report...");
    let report = Report::build(&survey, &responses, &filter, &config.report);

    let output = match args.format {
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, config.report.text_preview)
        }
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Csv => report::generate_results_csv(&report.results),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if let Some(ref export_path) = args.export_responses {
        let csv = report::generate_responses_csv(
            &responses,
            Some(&survey),
            &config.export.excluded_fields,
        );
        std::fs::write(export_path, csv).with_context(|| {
            format!("Failed to write responses to {}", export_path.display())
        })?;
        println!("   Responses exported to: {}", export_path.display());
    }

    // Print summary
    println!("\n📊 Results Summary:");
    println!("   Survey: {}", survey.display_name());
    println!("   Questions: {}", report.results.questions.len());
    println!("   Responses: {}", report.metadata.total_responses);
    for role in report.roles.iter().take(4) {
        println!("   - {}: {}", role.role, role.count);
    }
    println!("\n✅ Report complete! Saved to: {}", output_path.display());

    Ok(0)
}

/// Load responses from --responses, or start with none.
fn load_responses(args: &Args) -> Result<Vec<Response>> {
    let Some(ref path) = args.responses else {
        warn!("No responses given; every question will show an empty sample");
        return Ok(Vec::new());
    };

    println!("📥 Loading responses: {}", path.display());
    let options = LoadOptions {
        show_progress: !args.quiet,
    };
    Ok(store::load_responses(path, &options)?)
}

/// Handle --dry-run: report what was loaded and exit.
fn handle_dry_run(survey: &Survey, responses: &[Response]) -> Result<i32> {
    println!("\n🔍 Dry run: inputs loaded, nothing written.\n");
    println!("   Survey: {}", survey.display_name());
    for (index, question) in survey.questions.iter().enumerate() {
        println!(
            "     Q{} [{}] {} ({})",
            index + 1,
            question.id,
            question.text,
            question.kind.label()
        );
    }
    println!("\n   Matching responses: {}", responses.len());

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Handle --catalog: list the matching surveys and catalog statistics.
fn handle_catalog(path: &Path, args: &Args) -> Result<i32> {
    let surveys = store::load_catalog(path)?;
    let stats = CatalogStats::from_surveys(&surveys);

    let query = SurveyQuery {
        status: args.status.map(status_filter_to_status),
        search: args.search.clone(),
    };
    let matching = query.apply(&surveys);

    println!("\n📋 Surveys ({} of {}):\n", matching.len(), surveys.len());
    if matching.is_empty() {
        println!("   No surveys found.");
    }
    for survey in &matching {
        let end = survey
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {} [{}] {} | {} responses | ends {}",
            survey.display_name(),
            survey.status,
            if survey.category.is_empty() {
                "-"
            } else {
                survey.category.as_str()
            },
            survey.response_count,
            end
        );
    }

    println!("\n📊 Catalog:");
    println!("   Total surveys: {}", stats.total);
    println!("   Active: {}", stats.active);
    println!("   Total responses: {}", stats.total_responses);
    println!("   Active rate: {}%", stats.active_rate);

    Ok(0)
}

/// Convert StatusFilter to SurveyStatus for comparison.
fn status_filter_to_status(status: StatusFilter) -> SurveyStatus {
    match status {
        StatusFilter::Active => SurveyStatus::Active,
        StatusFilter::Draft => SurveyStatus::Draft,
        StatusFilter::Closed => SurveyStatus::Closed,
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!(
                "⚠️  Ignoring {}: {:#}. Using defaults.",
                CONFIG_FILE_NAME, e
            );
            Ok(Config::default())
        }
    }
}
