use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CountdownError;

/// Display language. Always passed explicitly; the core keeps no global setting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Picks the text for this language out of a (zh, en) pair.
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Zh => zh,
            Language::En => en,
        }
    }
}

impl FromStr for Language {
    type Err = CountdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" => Ok(Language::Zh),
            "en" | "en-us" | "en_us" => Ok(Language::En),
            other => Err(CountdownError::UnsupportedLanguage {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Zh);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("zh-CN".parse::<Language>().unwrap(), Language::Zh);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(
            err,
            CountdownError::UnsupportedLanguage {
                code: "fr".to_string()
            }
        );
    }
}
