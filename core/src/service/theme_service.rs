use anyhow::Result;

use crate::model::theme::Theme;
use crate::repository::PreferenceStore;

/// Current presentation theme, mirrored to the preference store.
pub struct ThemeController<P: PreferenceStore> {
    store: P,
    theme: Theme,
}

impl<P: PreferenceStore> ThemeController<P> {
    /// Starts from the stored theme. An unreadable preference falls back
    /// to the default.
    pub fn new(store: P) -> Self {
        let theme = match store.load_theme() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read theme preference");
                Theme::default()
            }
        };
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and persists it. The in-memory flip stands even if
    /// the write fails.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.store.save_theme(self.theme)?;
        tracing::debug!(theme = %self.theme, "theme saved");
        Ok(self.theme)
    }
}
