use std::path::PathBuf;

use anyhow::Result;

use crate::error::CountdownError;
use crate::language::Language;
use crate::model::settings::UserSettings;
use crate::repository::{resolve_base_dir, FileSettingsRepository, SettingsRepository};

/// Overrides the data directory (default `~/.eventbook`).
pub const HOME_ENV: &str = "EVENTBOOK_HOME";
/// Overrides the display language stored in the settings file.
pub const LANG_ENV: &str = "EVENTBOOK_LANG";

/// Resolved runtime configuration of a front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub language: Language,
    pub settings: UserSettings,
}

impl AppConfig {
    /// Reads `settings.json` from the data directory. An explicit `language`
    /// wins over the stored one.
    pub fn load(data_dir: Option<PathBuf>, language: Option<&str>) -> Result<Self> {
        let data_dir = resolve_base_dir(data_dir)?;
        let settings = FileSettingsRepository::new(Some(data_dir.clone()))?.load()?;
        let language = resolve_language(language, &settings)?;
        Ok(Self {
            data_dir,
            language,
            settings,
        })
    }

    pub fn base_dir(&self) -> Option<PathBuf> {
        Some(self.data_dir.clone())
    }
}

pub fn resolve_language(
    requested: Option<&str>,
    settings: &UserSettings,
) -> Result<Language, CountdownError> {
    match requested {
        Some(code) => code.parse(),
        None => Ok(settings.language),
    }
}
