//! Locsync - Localization Catalog Synchronizer
//!
//! Command-line entry point: scans configured source paths for translation
//! keys, reports or fills the missing ones, and maintains per-locale
//! catalog files.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use locsync::cli::{Args, Commands};
use locsync::config::{CatalogFormat, Config};
use locsync::catalog::LocaleCatalog;
use locsync::error::LocsyncError;
use locsync::provider::ProviderFactory;
use locsync::scanner::{self, Scanner, TranslationKey};
use locsync::workflow::{KeyOutcomes, SyncOptions, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    // Load configuration: explicit path, then locsync.toml, then defaults
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("locsync.toml").exists() {
                info!("Found locsync.toml in current directory, loading...");
                Config::from_file("locsync.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Sync {
            auto,
            translate,
            service,
            source,
            targets,
            dry_run,
            stats,
            format,
        } => {
            let mut config = config;

            // CLI overrides on top of the loaded configuration
            if let Some(service) = service {
                config.service = service;
            }
            if let Some(source) = source {
                config.source_language = source;
            }
            if let Some(targets) = targets {
                config.target_languages =
                    targets.split(',').map(|s| s.trim().to_string()).collect();
            }
            if let Some(format) = format {
                config.file_format = parse_catalog_format(&format)?;
            }

            run_sync(config, auto, translate, dry_run, stats).await
        }
        Commands::Init { locales, force } => run_init(config, locales, force).await,
    }
}

async fn run_sync(
    config: Config,
    auto: bool,
    translate: bool,
    dry_run: bool,
    stats: bool,
) -> Result<()> {
    let scanner = Scanner::from_config(&config)?;
    let workflow = Workflow::new(config.clone());

    if stats {
        return show_statistics(&config, &scanner, &workflow).await;
    }

    info!("Scanning for missing translations...");
    let report = scanner.scan().await?;
    if report.skipped_files > 0 {
        warn!("{} unreadable file(s) were skipped", report.skipped_files);
    }

    let oracle =
        LocaleCatalog::load(config.output_dir.as_ref(), config.check_locale(), config.file_format)
            .await?;
    let missing = scanner::find_missing(&report, &oracle);

    if missing.is_empty() {
        println!("No missing translations found.");
        return Ok(());
    }

    display_missing(&missing);

    if dry_run {
        println!("Dry run complete. No changes were made.");
        return Ok(());
    }

    if !auto {
        println!(
            "Found {} missing key(s). Re-run with --auto to add them to the catalogs.",
            missing.len()
        );
        return Ok(());
    }

    let options = SyncOptions {
        auto_translate: translate || config.auto_translate,
        fallback_strategy: config.fallback_strategy,
    };

    if options.auto_translate && !workflow.provider().is_configured() {
        let available: Vec<&str> = ProviderFactory::available()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        anyhow::bail!(
            "Auto-translation requested but provider '{}' is not configured. Available providers: {}",
            workflow.provider().name(),
            available.join(", ")
        );
    }

    let results = workflow.process_missing(&missing, options).await?;

    // Fallback outcomes are reported but are not run failures; only hard
    // scan/catalog errors (propagated above) fail the run.
    let mut fallbacks = 0;
    for (key, outcomes) in &results {
        display_key_result(key, outcomes);
        fallbacks += outcomes.values().filter(|o| !o.success).count();
    }

    println!();
    println!("Processed {} key(s).", results.len());
    if fallbacks > 0 {
        println!(
            "{} translation(s) used the configured fallback value.",
            fallbacks
        );
    }

    Ok(())
}

async fn show_statistics(config: &Config, scanner: &Scanner, workflow: &Workflow) -> Result<()> {
    let report = scanner.scan().await?;
    let oracle =
        LocaleCatalog::load(config.output_dir.as_ref(), config.check_locale(), config.file_format)
            .await?;
    let stats = scanner::statistics(&report, &oracle);

    println!("\nTranslation Statistics:");
    println!("{:<32} {:>8}", "Metric", "Value");
    println!("{}", "-".repeat(41));
    println!("{:<32} {:>8}", "Total translation keys found", stats.total_keys);
    println!("{:<32} {:>8}", "Missing translations", stats.missing_keys);
    println!("{:<32} {:>8}", "Translated keys", stats.translated_keys);
    println!("{:<32} {:>7}%", "Coverage", stats.coverage_percentage);
    if report.skipped_files > 0 {
        println!("{:<32} {:>8}", "Unreadable files skipped", report.skipped_files);
    }

    println!("\nTranslation Provider Status:");
    let provider = workflow.provider();
    if provider.is_configured() {
        println!("{} is configured and ready", provider.name());
        let languages = provider.supported_languages();
        let preview: Vec<&str> = languages.iter().take(10).copied().collect();
        print!("Supported languages: {}", preview.join(", "));
        if languages.len() > 10 {
            print!(" ... and {} more", languages.len() - 10);
        }
        println!();
    } else {
        let available: Vec<&str> = ProviderFactory::available()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        println!("No translation provider configured or available");
        println!("Available providers: {}", available.join(", "));
    }

    Ok(())
}

async fn run_init(config: Config, locales: Option<String>, force: bool) -> Result<()> {
    let locales: Vec<String> = match locales {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => {
            if config.app_locales.is_empty() {
                vec![config.source_language.clone()]
            } else {
                config.app_locales.clone()
            }
        }
    };

    if locales.is_empty() || locales.iter().all(|l| l.is_empty()) {
        anyhow::bail!("No locales specified. Use --locales=en,es,fr or configure app_locales");
    }

    info!("Initializing catalog files for: {}", locales.join(", "));

    let workflow = Workflow::new(config);
    let (created, skipped) = workflow.init_locales(&locales, force).await?;

    println!("Summary: {} created, {} skipped", created, skipped);

    Ok(())
}

/// Print missing keys with their origin files and one context excerpt
fn display_missing(missing: &[TranslationKey]) {
    println!("Found {} missing translation(s):", missing.len());
    println!();

    for key in missing {
        println!("- {}", key.text);

        let files: Vec<String> = key
            .occurrences
            .iter()
            .take(3)
            .map(|o| o.file.display().to_string())
            .collect();
        if !files.is_empty() {
            println!("  Found in: {}", files.join(", "));
            if key.occurrences.len() > 3 {
                println!("  ... and {} more file(s)", key.occurrences.len() - 3);
            }
        }

        if let Some(occurrence) = key.occurrences.first() {
            if !occurrence.context.is_empty() {
                println!("  Context:");
                for line in occurrence.context.lines() {
                    println!("    {}", line);
                }
            }
        }

        println!();
    }
}

/// Print per-language outcomes for one processed key
fn display_key_result(key: &str, outcomes: &KeyOutcomes) {
    println!("Added: {}", key);
    for (language, outcome) in outcomes {
        let status = if outcome.success { "ok" } else { "fallback" };
        println!(
            "  [{}] {}: {} ({})",
            status, language, outcome.value, outcome.method
        );
        if let Some(error) = &outcome.error {
            println!("        error: {}", error);
        }
    }
}

/// Setup logging to both console and a daily-rolling file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".locsync").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "locsync.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Parse a catalog format name from the command line. An unknown value is
/// a hard failure, never a silent default.
fn parse_catalog_format(format: &str) -> Result<CatalogFormat> {
    match format.to_lowercase().as_str() {
        "flat" => Ok(CatalogFormat::Flat),
        "scoped" => Ok(CatalogFormat::Scoped),
        _ => Err(LocsyncError::UnsupportedFormat(format!(
            "'{}'. Valid formats: flat, scoped",
            format
        ))
        .into()),
    }
}
