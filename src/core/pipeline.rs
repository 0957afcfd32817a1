use crate::core::export::{self, OutputFile};
use crate::core::{parser, sequencer};
use crate::core::{ConfigProvider, Pipeline, SequenceResult, Storage};
use crate::utils::error::{BoardingError, Result};
use crate::utils::validation;

/// Reads a booking manifest, ranks it and writes the boarding sequence.
///
/// `source` resolves the manifest path, `sink` receives the outputs.
pub struct BoardingPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BoardingPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    fn output_files(&self, result: &SequenceResult) -> Result<Vec<OutputFile>> {
        let names: Vec<String> = self
            .config
            .output_formats()
            .iter()
            .map(|format| expand_filename(&self.config.output_filename(format)))
            .collect();
        // 檔名重複時 ZIP 會失敗、散檔會互相覆蓋
        validation::validate_unique_filenames("output_formats", names.iter().map(String::as_str))?;

        self.config
            .output_formats()
            .iter()
            .zip(names)
            .map(|(format, name)| -> Result<OutputFile> {
                Ok(OutputFile {
                    name,
                    contents: export::render(format, &result.entries)?,
                })
            })
            .collect()
    }
}

/// 檔名樣板替換，目前只支援 {timestamp}
pub fn expand_filename(pattern: &str) -> String {
    if pattern.contains("{timestamp}") {
        pattern.replace(
            "{timestamp}",
            &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
        )
    } else {
        pattern.to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BoardingPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let path = self.config.input_path();
        tracing::debug!("Reading booking manifest from: {}", path);

        let data = self.source.read_file(path).await?;
        tracing::debug!("Read {} bytes", data.len());

        // 與瀏覽器讀檔行為一致，非 UTF-8 位元組以替代字元處理
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    async fn transform(&self, content: String) -> Result<SequenceResult> {
        let bookings = parser::parse(&content);

        if bookings.is_empty() {
            return Err(BoardingError::NoBookings {
                source_name: self.config.input_path().to_string(),
            });
        }

        let entries = sequencer::sequence(&bookings);
        if let Some(first) = entries.first() {
            tracing::debug!(
                "Booking {} boards first (furthest seat distance {})",
                first.booking_id,
                first.max_distance
            );
        }

        Ok(SequenceResult {
            source_name: self.config.input_path().to_string(),
            bookings_parsed: bookings.len(),
            entries,
        })
    }

    async fn load(&self, result: SequenceResult) -> Result<String> {
        let files = self.output_files(&result)?;
        let output_dir = self.config.output_path();

        if let Some(bundle_name) = self.config.bundle_filename() {
            let bundle_name = expand_filename(&bundle_name);
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = export::bundle(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.sink.write_file(&bundle_name, &zip_data).await?;

            return Ok(format!("{}/{}", output_dir, bundle_name));
        }

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            tracing::debug!("Writing {} ({} bytes)", file.name, file.contents.len());
            self.sink.write_file(&file.name, &file.contents).await?;
            written.push(format!("{}/{}", output_dir, file.name));
        }

        Ok(written.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::new();
            storage
                .files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BoardingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<String>,
        bundle: Option<String>,
    }

    impl MockConfig {
        fn new(formats: &[&str]) -> Self {
            Self {
                formats: formats.iter().map(|f| f.to_string()).collect(),
                bundle: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "bookings.txt"
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn bundle_filename(&self) -> Option<String> {
            self.bundle.clone()
        }

        fn output_filename(&self, format: &str) -> String {
            format!("result.{}", format)
        }
    }

    const MANIFEST: &str = "Booking_ID\tSeats\n101\tA1,B1\n120\tA20,C2\n";

    #[tokio::test]
    async fn test_extract_transform_load() {
        let source = MockStorage::with_file("bookings.txt", MANIFEST).await;
        let sink = MockStorage::new();
        let pipeline = BoardingPipeline::new(source, sink.clone(), MockConfig::new(&["tsv", "json"]));

        let content = pipeline.extract().await.unwrap();
        let result = pipeline.transform(content).await.unwrap();
        assert_eq!(result.bookings_parsed, 2);
        assert_eq!(result.entries[0].booking_id, "120");

        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out/result.tsv, out/result.json");

        let tsv = sink.get_file("result.tsv").await.unwrap();
        assert_eq!(tsv, b"Seq\tBooking_ID\n1\t120\n2\t101");
        assert!(sink.get_file("result.json").await.is_some());
    }

    #[tokio::test]
    async fn test_transform_without_bookings_fails() {
        let pipeline = BoardingPipeline::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new(&["tsv"]),
        );

        let err = pipeline
            .transform("Booking_ID Seats\n101\n".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, BoardingError::NoBookings { .. }));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_io_error() {
        let pipeline = BoardingPipeline::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new(&["tsv"]),
        );
        assert!(matches!(
            pipeline.extract().await,
            Err(BoardingError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_replaces_invalid_utf8() {
        let source = MockStorage::new();
        source
            .files
            .lock()
            .await
            .insert("bookings.txt".to_string(), vec![b'1', b' ', b'A', b'1', 0xff]);
        let pipeline = BoardingPipeline::new(source, MockStorage::new(), MockConfig::new(&["tsv"]));

        let content = pipeline.extract().await.unwrap();
        assert_eq!(content, "1 A1\u{fffd}");
    }

    #[tokio::test]
    async fn test_bundle_writes_single_zip() {
        let source = MockStorage::with_file("bookings.txt", MANIFEST).await;
        let sink = MockStorage::new();
        let mut config = MockConfig::new(&["tsv", "csv", "map"]);
        config.bundle = Some("boarding.zip".to_string());
        let pipeline = BoardingPipeline::new(source, sink.clone(), config);

        let content = pipeline.extract().await.unwrap();
        let result = pipeline.transform(content).await.unwrap();
        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "out/boarding.zip");

        let zip_data = sink.get_file("boarding.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);
        assert!(sink.get_file("result.tsv").await.is_none());
    }

    #[tokio::test]
    async fn test_repeated_format_fails_before_writing() {
        let source = MockStorage::with_file("bookings.txt", MANIFEST).await;
        let sink = MockStorage::new();
        let mut config = MockConfig::new(&["tsv", "tsv"]);
        config.bundle = Some("boarding.zip".to_string());
        let pipeline = BoardingPipeline::new(source, sink.clone(), config);

        let content = pipeline.extract().await.unwrap();
        let result = pipeline.transform(content).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(err, BoardingError::InvalidConfigValueError { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(sink.get_file("boarding.zip").await.is_none());
    }

    #[test]
    fn test_expand_filename() {
        assert_eq!(expand_filename("plain.txt"), "plain.txt");
        let expanded = expand_filename("seq_{timestamp}.zip");
        assert!(expanded.starts_with("seq_"));
        assert!(!expanded.contains("{timestamp}"));
        assert_eq!(expanded.len(), "seq_20250101_120000.zip".len());
    }
}
