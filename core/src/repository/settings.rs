use std::path::PathBuf;

use anyhow::Result;

use crate::model::settings::UserSettings;
use crate::repository::file::JsonFile;
use crate::repository::traits::SettingsRepository;

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone, Debug)]
pub struct FileSettingsRepository {
    file: JsonFile,
}

impl FileSettingsRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file = JsonFile::open(base_dir, SETTINGS_FILE_NAME, UserSettings::default)?;
        Ok(FileSettingsRepository { file })
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> Result<UserSettings> {
        self.file.read()
    }

    fn save(&self, settings: &UserSettings) -> Result<()> {
        self.file.write(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_then_persisted_change() {
        let dir = TempDir::new().unwrap();
        let repo = FileSettingsRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let mut settings = repo.load().unwrap();
        assert_eq!(settings, UserSettings::default());

        settings.language = Language::En;
        repo.save(&settings).unwrap();

        let reopened = FileSettingsRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.load().unwrap().language, Language::En);
    }
}
