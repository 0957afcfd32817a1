use anyhow::Result;
use bus_boarding::{
    BoardingEngine, BoardingError, BoardingPipeline, CliConfig, LocalStorage, TomlConfig,
};
use std::io::Read;
use tempfile::TempDir;

const MANIFEST: &str = "Booking_ID\tSeats\n101\tA1,B1\n120\tA20,C2\n";

fn cli_config(input: &str, output_path: &str, formats: &[&str], bundle: bool) -> CliConfig {
    CliConfig {
        input: input.to_string(),
        output_path: output_path.to_string(),
        formats: formats.iter().map(|f| f.to_string()).collect(),
        bundle,
        bundle_name: "boarding_output.zip".to_string(),
        stdout: false,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

#[tokio::test]
async fn test_end_to_end_writes_sequence_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("bookings.txt");
    std::fs::write(&input, MANIFEST)?;
    let output_dir = temp_dir.path().join("out");
    let output_path = output_dir.to_str().unwrap().to_string();

    let config = cli_config(input.to_str().unwrap(), &output_path, &["tsv", "csv", "json", "map"], false);
    let pipeline = BoardingPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );

    let report = BoardingEngine::new_with_monitoring(pipeline, false).run().await?;
    assert_eq!(report.bookings_parsed, 2);
    assert_eq!(report.entries[0].booking_id, "120");
    assert_eq!(report.entries[0].max_distance, 20);

    let tsv = std::fs::read_to_string(output_dir.join("boarding_sequence.txt"))?;
    assert_eq!(tsv, "Seq\tBooking_ID\n1\t120\n2\t101");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.join("boarding_sequence.json"))?)?;
    assert_eq!(json["sequence"][1]["bookingId"], "101");
    assert_eq!(json["details"][0]["maxDistance"], 20);

    let csv = std::fs::read_to_string(output_dir.join("boarding_details.csv"))?;
    assert!(csv.starts_with("seq,booking_id,seats,max_distance\n"));

    let map = std::fs::read_to_string(output_dir.join("seat_map.txt"))?;
    assert!(map.starts_with("Back of Bus\n"));
    assert!(map.ends_with("Front Entry\n"));
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("bookings.txt");
    std::fs::write(&input, "101   A1,B1\n120   A20,C2\n")?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = cli_config(input.to_str().unwrap(), &output_path, &["tsv", "map"], true);
    let pipeline = BoardingPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );

    let report = BoardingEngine::new(pipeline).run().await?;
    assert!(report.output_path.ends_with("boarding_output.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("boarding_output.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 2);

    let mut tsv = String::new();
    archive.by_name("boarding_sequence.txt")?.read_to_string(&mut tsv)?;
    assert_eq!(tsv, "Seq\tBooking_ID\n1\t120\n2\t101");
    assert!(!temp_dir.path().join("boarding_sequence.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_manifest_without_bookings_reports_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("empty.txt");
    std::fs::write(&input, "Booking_ID\tSeats\n101\n\n")?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = cli_config(input.to_str().unwrap(), &output_path, &["tsv"], false);
    let pipeline = BoardingPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );

    let err = BoardingEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, BoardingError::NoBookings { .. }));
    assert_eq!(err.user_friendly_message(), "No valid bookings found in file");
    assert_eq!(err.exit_code(), 2);
    assert!(!std::path::Path::new(&output_path).exists());
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("route.tsv");
    std::fs::write(&input, "7 A3\n8 B3\n9 QQ\n")?;
    let output_path = temp_dir.path().join("out");

    let toml_content = format!(
        r#"
[pipeline]
name = "route-9"

[source]
path = "{}"

[load]
output_path = "{}"
output_formats = ["tsv"]

[load.filenames]
tsv = "route9.txt"
"#,
        input.display(),
        output_path.display()
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;

    let pipeline = BoardingPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.to_str().unwrap()),
        config,
    );
    BoardingEngine::new(pipeline).run().await?;

    let tsv = std::fs::read_to_string(output_path.join("route9.txt"))?;
    assert_eq!(tsv, "Seq\tBooking_ID\n1\t9\n2\t7\n3\t8");
    Ok(())
}
