use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static ENGLISH: Lazy<Value> = Lazy::new(|| parse(include_str!("locales/english.json")));
static RUSSIAN: Lazy<Value> = Lazy::new(|| parse(include_str!("locales/russian.json")));

fn parse(source: &str) -> Value {
    serde_json::from_str(source).unwrap_or_else(|e| {
        log::error!("Failed to parse translation dictionary: {e}");
        Value::Null
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Russian => "russian",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Русский",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|language| language.code() == code)
    }

    fn dictionary(self) -> &'static Value {
        match self {
            Language::English => &ENGLISH,
            Language::Russian => &RUSSIAN,
        }
    }
}

fn lookup<'a>(dictionary: &'a Value, path: &str) -> Option<&'a str> {
    path.split('.')
        .try_fold(dictionary, |node, key| node.get(key))?
        .as_str()
        .filter(|text| !text.is_empty())
}

/// Dotted-key lookup, e.g. `dashboard.styles.retro.title`.
///
/// Falls back to English, then to the key itself.
pub fn translate(language: Language, path: &str) -> String {
    lookup(language.dictionary(), path)
        .or_else(|| lookup(Language::English.dictionary(), path))
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionaries_parse() {
        assert!(ENGLISH.is_object());
        assert!(RUSSIAN.is_object());
    }

    #[test]
    fn test_translate_nested_key() {
        assert_eq!(translate(Language::English, "dashboard.styles.retro.title"), "Retro");
        assert_eq!(translate(Language::Russian, "header.signOut"), "Выйти");
    }

    #[test]
    fn test_missing_key_falls_back_to_english() {
        assert_eq!(translate(Language::Russian, "history.title"), "Generation History");
    }

    #[test]
    fn test_unknown_key_returns_path() {
        assert_eq!(translate(Language::English, "dashboard.nope"), "dashboard.nope");
        // objects are not leaf strings
        assert_eq!(translate(Language::English, "dashboard.styles"), "dashboard.styles");
    }

    #[test]
    fn test_language_codes() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
        assert_eq!(Language::from_code("klingon"), None);
    }
}
