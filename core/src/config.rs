use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE: &str = "TodoList";
const DATA_DIR_NAME: &str = ".todobase";
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve the data directory, creating it when missing.
/// Defaults to `~/.todobase`.
pub fn data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(DATA_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create data directory {}", path.display()))?;
    Ok(path)
}

/// Partially filled backend settings, as found in one source
/// (config file, flags, environment).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Settings {
    /// Read `config.json` from `dir`. A missing file yields empty settings.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(settings)
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn overlay(self, other: Settings) -> Settings {
        Settings {
            url: other.url.or(self.url),
            api_key: other.api_key.or(self.api_key),
            table: other.table.or(self.table),
        }
    }
}

/// Connection settings for the remote table.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

impl BackendConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let url = non_blank(settings.url)
            .ok_or_else(|| anyhow!("Backend URL is not set (use --url or TODOBASE_URL)"))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("Backend URL must start with http:// or https://, got '{}'", url));
        }
        let api_key = non_blank(settings.api_key)
            .ok_or_else(|| anyhow!("API key is not set (use --api-key or TODOBASE_API_KEY)"))?;
        let table = non_blank(settings.table).unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(BackendConfig::new(url, api_key, table))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(url: Option<&str>, key: Option<&str>, table: Option<&str>) -> Settings {
        Settings {
            url: url.map(str::to_string),
            api_key: key.map(str::to_string),
            table: table.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_table_and_strips_slash() {
        let raw = settings(Some("https://x.supabase.co/"), Some("anon"), None);
        let config = BackendConfig::from_settings(raw).unwrap();
        assert_eq!(config.url, "https://x.supabase.co");
        assert_eq!(config.api_key, "anon");
        assert_eq!(config.table, DEFAULT_TABLE);
    }

    #[test]
    fn test_missing_or_invalid_values() {
        let err = BackendConfig::from_settings(settings(None, Some("anon"), None)).unwrap_err();
        assert!(err.to_string().contains("TODOBASE_URL"));

        let err =
            BackendConfig::from_settings(settings(Some("http://h"), Some("  "), None)).unwrap_err();
        assert!(err.to_string().contains("TODOBASE_API_KEY"));

        assert!(BackendConfig::from_settings(settings(Some("ftp://h"), Some("k"), None)).is_err());
    }

    #[test]
    fn test_overlay_prefers_later_source() {
        let file = settings(Some("https://file"), Some("file-key"), Some("Todos"));
        let flags = settings(Some("https://flag"), None, None);
        let merged = file.overlay(flags);
        assert_eq!(merged, settings(Some("https://flag"), Some("file-key"), Some("Todos")));
    }

    #[test]
    fn test_load_settings_file() {
        let dir = tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "url": "https://abc.supabase.co", "api_key": "anon" }"#,
        )
        .unwrap();
        let loaded = Settings::load(dir.path()).unwrap();
        assert_eq!(loaded, settings(Some("https://abc.supabase.co"), Some("anon"), None));

        fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn test_data_dir_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let resolved = data_dir(Some(nested.clone())).unwrap();
        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }
}
