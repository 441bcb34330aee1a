//! Message locale selection.
//!
//! Diagnostics render in English, Belarusian or Russian. The locale comes
//! from the process environment: `CO_LANG` wins, then the usual POSIX
//! variables in their priority order.

/// A supported diagnostic locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Be,
    Ru,
}

impl Locale {
    /// Parse a locale tag such as `be`, `ru_RU.UTF-8` or `en-US`.
    pub fn parse(tag: &str) -> Option<Locale> {
        let lang = tag
            .split(['_', '-', '.'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" | "c" | "posix" => Some(Locale::En),
            "be" => Some(Locale::Be),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// Detect the locale from the process environment.
    ///
    /// Checks `CO_LANG`, `LC_ALL`, `LC_MESSAGES`, `LANG` in order; the first
    /// variable that parses wins. Falls back to English.
    pub fn from_env() -> Locale {
        for var in ["CO_LANG", "LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                if let Some(locale) = Locale::parse(&value) {
                    return locale;
                }
            }
        }
        Locale::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_tags() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("be"), Some(Locale::Be));
        assert_eq!(Locale::parse("ru"), Some(Locale::Ru));
    }

    #[test]
    fn parses_posix_tags() {
        assert_eq!(Locale::parse("ru_RU.UTF-8"), Some(Locale::Ru));
        assert_eq!(Locale::parse("be-BY"), Some(Locale::Be));
        assert_eq!(Locale::parse("C"), Some(Locale::En));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(Locale::parse("fr_FR"), None);
        assert_eq!(Locale::parse(""), None);
    }
}
