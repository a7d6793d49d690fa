use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::theme::Theme;

const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Client-local key/value preferences.
pub trait PreferenceStore {
    fn load_theme(&self) -> Result<Option<Theme>>;
    fn save_theme(&self, theme: Theme) -> Result<()>;
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

#[derive(Clone)]
pub struct FilePreferenceStore {
    file_path: PathBuf,
}

impl FilePreferenceStore {
    /// `dir` must exist; see [`crate::config::data_dir`].
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join(PREFERENCES_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> Result<Preferences> {
        if !self.file_path.exists() {
            return Ok(Preferences::default());
        }
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        let prefs = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid preferences file {}", self.file_path.display()))?;
        Ok(prefs)
    }

    fn write(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.file_path)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, prefs)?;
        writer.flush()?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_theme(&self) -> Result<Option<Theme>> {
        Ok(self.read()?.theme)
    }

    fn save_theme(&self, theme: Theme) -> Result<()> {
        // Keep whatever else is in the file; start over if it is unreadable.
        let mut prefs = self.read().unwrap_or_default();
        prefs.theme = Some(theme);
        self.write(&prefs)
    }
}
