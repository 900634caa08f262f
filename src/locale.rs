//! Supported feedback locales

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locales the message catalog ships templates for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish is the authoring locale; every rule has a Spanish template
    #[default]
    Spanish,
    English,
}

impl Locale {
    /// Get the ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Spanish => "es",
            Locale::English => "en",
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Locale::Spanish => "Spanish",
            Locale::English => "English",
        }
    }

    /// Get all supported locales
    pub fn all() -> Vec<Locale> {
        vec![Locale::Spanish, Locale::English]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "es" | "spanish" | "es-ar" | "es-es" => Ok(Locale::Spanish),
            "en" | "english" | "en-us" => Ok(Locale::English),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_code() {
        assert_eq!(Locale::Spanish.code(), "es");
        assert_eq!(Locale::English.code(), "en");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("es".parse(), Ok(Locale::Spanish));
        assert_eq!("English".parse(), Ok(Locale::English));
        assert_eq!("es-AR".parse(), Ok(Locale::Spanish));
        assert!("zz".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_spanish() {
        assert_eq!(Locale::default(), Locale::Spanish);
    }

    #[test]
    fn test_all_locales() {
        let all = Locale::all();
        assert!(all.contains(&Locale::Spanish));
        assert!(all.contains(&Locale::English));
    }
}
