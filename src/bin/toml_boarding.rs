use anyhow::Context;
use bus_boarding::config::toml_config::TomlConfig;
use bus_boarding::core::ConfigProvider;
use bus_boarding::utils::{logger, validation::Validate};
use bus_boarding::{parse, sequence, BoardingEngine, BoardingPipeline, LocalStorage};
use clap::Parser;

/// How many boarders the dry run previews.
const PREVIEW_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "toml-boarding")]
#[command(about = "Boarding sequence runs driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "boarding.toml")]
    config: String,

    /// Override the manifest path from config
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Parse and rank the manifest without writing any output
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init(args.verbose || config.verbose_logging(), args.log_json);
    tracing::info!("🚀 Starting TOML-based boarding run");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Manifest overridden to: {}", input);
        config.source.path = Some(input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        return perform_dry_run(&config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(".");
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = BoardingPipeline::new(source, sink, config);
    let engine = BoardingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Boarding run completed successfully!");
            println!(
                "✅ Sequenced {} booking(s). 📁 Output saved to: {}",
                report.bookings_parsed, report.output_path
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Boarding run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0")
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Manifest: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if let Some(bundle) = config.bundle_filename() {
        println!("  Bundle: {} (ZIP)", bundle);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let path = config.input_path();
    let content = std::fs::read(path)
        .with_context(|| format!("failed to read booking manifest '{}'", path))?;
    let content = String::from_utf8_lossy(&content);

    let bookings = parse(&content);
    if bookings.is_empty() {
        anyhow::bail!("No valid bookings found in {}", path);
    }
    let entries = sequence(&bookings);

    println!("🔍 Dry Run Analysis:");
    println!("  Bookings parsed: {}", bookings.len());
    println!(
        "  Seats: {}",
        bookings.iter().map(|b| b.seats.len()).sum::<usize>()
    );
    println!();
    println!("🚌 First to board:");
    for entry in entries.iter().take(PREVIEW_LIMIT) {
        println!(
            "  {}. Booking {} (seats {}, furthest {})",
            entry.seq,
            entry.booking_id,
            entry.seats.join(","),
            entry.max_distance
        );
    }
    if entries.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", entries.len() - PREVIEW_LIMIT);
    }

    println!();
    for format in &config.load.output_formats {
        println!(
            "  Would write {} to {}/{}",
            format,
            config.output_path(),
            config.output_filename(format)
        );
    }

    println!();
    println!("✅ Dry run complete. Use --verbose for more details during an actual run.");
    Ok(())
}
