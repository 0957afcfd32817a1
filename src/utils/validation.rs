use crate::utils::error::{BoardingError, Result};
use std::collections::HashSet;

/// 支援的輸出格式
pub const OUTPUT_FORMATS: [&str; 4] = ["tsv", "csv", "json", "map"];

/// 上傳表單接受的檔案類型
pub const MANIFEST_EXTENSIONS: [&str; 3] = ["txt", "tsv", "csv"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let allowed: HashSet<&str> = OUTPUT_FORMATS.iter().copied().collect();
    let mut seen = HashSet::new();
    for format in formats {
        if !seen.insert(format.as_str()) {
            return Err(BoardingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Output format listed more than once".to_string(),
            });
        }
        if !allowed.contains(format.as_str()) {
            return Err(BoardingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }

    Ok(())
}

/// 不同格式不可寫到同一個檔名，否則 ZIP 會重複、散檔會互相覆蓋
pub fn validate_unique_filenames<'a>(
    field_name: &str,
    filenames: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in filenames {
        if !seen.insert(name) {
            return Err(BoardingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Two output formats resolve to the same filename".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| BoardingError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
