use crate::config::{default_filename, DEFAULT_BUNDLE_FILENAME};
use crate::core::ConfigProvider;
use crate::utils::error::{BoardingError, Result};
use crate::utils::validation::{self, Validate, MANIFEST_EXTENSIONS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 訂位清單路徑，可由命令列覆蓋
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub tsv: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
    pub map: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub system_stats: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoardingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BoardingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MANIFEST_PATH})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let input = validation::validate_required_field("source.path", &self.source.path)?;
        validation::validate_path("source.path", input)?;
        validation::validate_file_extension("source.path", input, &MANIFEST_EXTENSIONS)?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        let resolved: Vec<String> = self
            .load
            .output_formats
            .iter()
            .map(|format| self.output_filename(format))
            .collect();
        validation::validate_unique_filenames("load.filenames", resolved.iter().map(String::as_str))?;

        if let Some(name) = self.load.compression.as_ref().and_then(|c| c.filename.as_ref()) {
            validation::validate_non_empty_string("load.compression.filename", name)?;
        }

        Ok(())
    }

    pub fn input_path(&self) -> &str {
        self.source.path.as_deref().unwrap_or_default()
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring
            .as_ref()
            .map(|m| m.enabled && m.system_stats.unwrap_or(true))
            .unwrap_or(false)
    }

    pub fn verbose_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .map(|level| level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace"))
            .unwrap_or(false)
    }

    fn custom_filename(&self, format: &str) -> Option<&String> {
        let filenames = self.load.filenames.as_ref()?;
        match format {
            "tsv" => filenames.tsv.as_ref(),
            "csv" => filenames.csv.as_ref(),
            "json" => filenames.json.as_ref(),
            "map" => filenames.map.as_ref(),
            _ => None,
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.input_path()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn bundle_filename(&self) -> Option<String> {
        let compression = self.load.compression.as_ref().filter(|c| c.enabled)?;
        Some(
            compression
                .filename
                .clone()
                .unwrap_or_else(|| DEFAULT_BUNDLE_FILENAME.to_string()),
        )
    }

    fn output_filename(&self, format: &str) -> String {
        self.custom_filename(format)
            .cloned()
            .unwrap_or_else(|| default_filename(format))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
