use serde::Serialize;

/// A target language the service can translate into and speak
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub display_name: &'static str,
    pub flag: &'static str,
    /// Language code handed to the speech synthesizer
    pub synthesis_voice_code: &'static str,
}

/// Public shape served by `GET /languages`
#[derive(Debug, Serialize)]
pub struct LanguageSummary {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

impl From<&LanguageEntry> for LanguageSummary {
    fn from(entry: &LanguageEntry) -> Self {
        Self {
            code: entry.code,
            name: entry.display_name,
            flag: entry.flag,
        }
    }
}

const BUILTIN_LANGUAGES: &[LanguageEntry] = &[
    LanguageEntry { code: "en", display_name: "English", flag: "🇺🇸", synthesis_voice_code: "en" },
    LanguageEntry { code: "fr", display_name: "French", flag: "🇫🇷", synthesis_voice_code: "fr" },
    LanguageEntry { code: "es", display_name: "Spanish", flag: "🇪🇸", synthesis_voice_code: "es" },
    LanguageEntry { code: "de", display_name: "German", flag: "🇩🇪", synthesis_voice_code: "de" },
    LanguageEntry { code: "it", display_name: "Italian", flag: "🇮🇹", synthesis_voice_code: "it" },
    LanguageEntry { code: "zh", display_name: "Chinese", flag: "🇨🇳", synthesis_voice_code: "zh" },
    LanguageEntry { code: "hi", display_name: "Hindi", flag: "🇮🇳", synthesis_voice_code: "hi" },
    LanguageEntry { code: "ar", display_name: "Arabic", flag: "🇸🇦", synthesis_voice_code: "ar" },
    LanguageEntry { code: "ru", display_name: "Russian", flag: "🇷🇺", synthesis_voice_code: "ru" },
    LanguageEntry { code: "pt", display_name: "Portuguese", flag: "🇵🇹", synthesis_voice_code: "pt" },
];

/// Read-only table of supported languages, in display order
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
}

impl LanguageCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_LANGUAGES.to_vec(),
        }
    }

    pub fn list(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Display name for a code, or the code itself when it is not in the catalog
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|entry| entry.display_name).unwrap_or(code)
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.code).collect()
    }
}

/// Whisper servers report either ISO codes ("en", "en-US") or lowercase
/// language names ("english"). Collapse both to a bare ISO 639-1 code.
pub fn normalize_language_code(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return "en".to_string();
    }

    let mapped = match lowered.as_str() {
        "english" => "en",
        "french" => "fr",
        "spanish" => "es",
        "german" => "de",
        "italian" => "it",
        "chinese" | "mandarin" => "zh",
        "hindi" => "hi",
        "arabic" => "ar",
        "russian" => "ru",
        "portuguese" => "pt",
        "japanese" => "ja",
        "korean" => "ko",
        "dutch" => "nl",
        "polish" => "pl",
        "turkish" => "tr",
        "ukrainian" => "uk",
        _ => "",
    };
    if !mapped.is_empty() {
        return mapped.to_string();
    }

    lowered
        .split(['-', '_'])
        .next()
        .unwrap_or(lowered.as_str())
        .to_string()
}
