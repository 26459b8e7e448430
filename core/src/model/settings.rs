use serde::{Deserialize, Serialize};

use crate::language::Language;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationTiming {
    pub id: String,
    pub label: String,
    pub minutes_before: u32,
}

impl NotificationTiming {
    fn new(id: &str, label: &str, minutes_before: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            minutes_before,
        }
    }
}

/// Stored preferences only. Nothing in this crate delivers notifications.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub timings: Vec<NotificationTiming>,
    pub sound_enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            timings: vec![
                NotificationTiming::new("1day", "1 day before", 1440),
                NotificationTiming::new("1hour", "1 hour before", 60),
                NotificationTiming::new("30min", "30 minutes before", 30),
            ],
            sound_enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::default();
        assert_eq!(settings.language, Language::Zh);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(!settings.notifications.enabled);
        let minutes: Vec<u32> = settings
            .notifications
            .timings
            .iter()
            .map(|t| t.minutes_before)
            .collect();
        assert_eq!(minutes, vec![1440, 60, 30]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: UserSettings = serde_json::from_str(r#"{"language":"en"}"#).unwrap();
        assert_eq!(settings.language, Language::En);
        assert!(settings.notifications.sound_enabled);
    }
}
