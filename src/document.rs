use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Reads a TOML, JSON or YAML document, picking the format from the file
/// extension.
///
/// Files without a known extension are tried as TOML, then JSON, then YAML.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    match extension {
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML: {}", path.display())),
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON: {}", path.display())),
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML: {}", path.display())),
        _ => toml::from_str(&contents)
            .or_else(|_| serde_json::from_str(&contents))
            .or_else(|_| serde_yaml::from_str(&contents))
            .with_context(|| format!("Failed to parse file: {}", path.display())),
    }
}

/// Writes a document in the format matching the file extension, TOML by default.
pub fn write_document<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::to_string_pretty(value)?,
        Some("yaml") | Some("yml") => serde_yaml::to_string(value)?,
        _ => toml::to_string_pretty(value)?,
    };

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
