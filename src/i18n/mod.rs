//! Internationalization (i18n) of the interface strings

use serde::Serialize;

/// Interface strings for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiStrings {
    pub home: &'static str,
    pub load_more: &'static str,
    pub loading: &'static str,
    pub not_found: &'static str,
    pub minutes: &'static str,
    pub banner_alt: &'static str,
}

static PT_BR: UiStrings = UiStrings {
    home: "Home",
    load_more: "Carregar mais posts",
    loading: "Carregando...",
    not_found: "Post não encontrado",
    minutes: "min",
    banner_alt: "banner",
};

static EN: UiStrings = UiStrings {
    home: "Home",
    load_more: "Load more posts",
    loading: "Loading...",
    not_found: "Post not found",
    minutes: "min",
    banner_alt: "banner",
};

impl UiStrings {
    /// Strings for a language tag; Portuguese unless English is asked for
    pub fn for_language(language: &str) -> &'static UiStrings {
        let language = language.trim().to_ascii_lowercase();
        if language == "en" || language.starts_with("en-") || language.starts_with("en_") {
            &EN
        } else {
            &PT_BR
        }
    }
}
