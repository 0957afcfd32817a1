use bus_boarding::utils::{logger, validation::Validate};
use bus_boarding::{render_tsv, BoardingEngine, BoardingPipeline, CliConfig, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.log_json);

    tracing::info!("Starting bus-boarding CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let print_table = config.stdout;

    // 讀檔用目前目錄，輸出寫到 output_path
    let source = LocalStorage::new(".");
    let sink = LocalStorage::new(config.output_path.clone());
    let pipeline = BoardingPipeline::new(source, sink, config);

    let engine = BoardingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "✅ Boarding sequence ready for {} booking(s)",
                report.bookings_parsed
            );
            if print_table {
                println!("{}", render_tsv(&report.entries));
            }
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Boarding run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
