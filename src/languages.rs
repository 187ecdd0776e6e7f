//! # Language Catalog
//!
//! Static mapping of engine language codes to display names, loaded once at
//! process start and never mutated. A single ordered list of records replaces
//! any parallel code/name lists, so lookups are field accesses rather than
//! positional coupling.

use lazy_static::lazy_static;

use crate::errors::{AppResult, OcrError};

/// Language code used when the caller expresses no preference
pub const DEFAULT_LANGUAGE: &str = "eng";

/// One catalog record: engine code plus human-readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub display_name: &'static str,
}

// Codes follow the engine's traineddata naming. The catalog covers the
// languages the front-end offers, not everything the engine could load.
const CATALOG_SOURCE: &[(&str, &str)] = &[
    ("afr", "Afrikaans"),
    ("sqi", "Albanian"),
    ("ara", "Arabic"),
    ("aze", "Azerbaijani"),
    ("bel", "Belarusian"),
    ("ben", "Bengali"),
    ("bul", "Bulgarian"),
    ("cat", "Catalan"),
    ("chi_sim", "Chinese (Simplified)"),
    ("chi_tra", "Chinese (Traditional)"),
    ("hrv", "Croatian"),
    ("ces", "Czech"),
    ("dan", "Danish"),
    ("nld", "Dutch"),
    ("eng", "English"),
    ("est", "Estonian"),
    ("fin", "Finnish"),
    ("fra", "French"),
    ("deu", "German"),
    ("ell", "Greek"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("hun", "Hungarian"),
    ("isl", "Icelandic"),
    ("ind", "Indonesian"),
    ("ita", "Italian"),
    ("jpn", "Japanese"),
    ("kor", "Korean"),
    ("lav", "Latvian"),
    ("lit", "Lithuanian"),
    ("mkd", "Macedonian"),
    ("nor", "Norwegian"),
    ("pol", "Polish"),
    ("por", "Portuguese"),
    ("ron", "Romanian"),
    ("rus", "Russian"),
    ("srp", "Serbian"),
    ("slk", "Slovak"),
    ("slv", "Slovenian"),
    ("spa", "Spanish"),
    ("swe", "Swedish"),
    ("tha", "Thai"),
    ("tur", "Turkish"),
    ("ukr", "Ukrainian"),
    ("vie", "Vietnamese"),
];

lazy_static! {
    static ref CATALOG: Vec<LanguageEntry> = {
        let mut entries: Vec<LanguageEntry> = CATALOG_SOURCE
            .iter()
            .map(|&(code, display_name)| LanguageEntry { code, display_name })
            .collect();
        entries.sort_by_key(|entry| entry.display_name);
        entries
    };
}

/// All catalog languages, ordered by display name for presentation.
pub fn all_languages() -> &'static [LanguageEntry] {
    &CATALOG
}

/// Resolve a display name back to its engine code.
pub fn code_for_display_name(name: &str) -> AppResult<&'static str> {
    CATALOG
        .iter()
        .find(|entry| entry.display_name == name)
        .map(|entry| entry.code)
        .ok_or_else(|| {
            OcrError::UnknownLanguage(format!("\"{}\" is not in the language catalog", name))
        })
}

/// Display name for a catalog code, if present.
pub fn display_name_for_code(code: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.display_name)
}

/// Whether `code` appears in the engine's installed language set.
pub fn is_installed(code: &str, installed: &[String]) -> bool {
    installed.iter().any(|lang| lang == code)
}
