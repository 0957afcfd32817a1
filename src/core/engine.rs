use crate::core::{BoardingSequenceEntry, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 一次執行的結果摘要
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub bookings_parsed: usize,
    pub entries: Vec<BoardingSequenceEntry>,
}

pub struct BoardingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> BoardingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚌 Starting boarding sequence run");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("📥 Reading booking manifest...");
        let content = self.pipeline.extract().await?;
        tracing::info!("Read {} line(s)", content.lines().count());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Computing boarding order...");
        let result = self.pipeline.transform(content).await?;
        tracing::info!(
            "Sequenced {} booking(s) from {}",
            result.entries.len(),
            result.source_name
        );
        self.monitor.log_stats("Transform");

        let bookings_parsed = result.bookings_parsed;
        let entries = result.entries.clone();

        // Load
        tracing::info!("💾 Writing boarding sequence...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunReport {
            output_path,
            bookings_parsed,
            entries,
        })
    }
}
