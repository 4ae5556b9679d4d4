//! Completes partially-supplied field values into English/Amharic pairs.

mod dictionary;
pub mod numerals;

pub use dictionary::{Dictionary, DictionaryFile, Entry, Vocabulary};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A field value in both certificate languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub am: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, am: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            am: am.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.am.is_empty()
    }
}

/// U+1200–U+137F Ethiopic, U+1380–U+139F Ethiopic Supplement,
/// U+2D80–U+2DDF Ethiopic Extended.
pub fn is_ethiopic(c: char) -> bool {
    matches!(c, '\u{1200}'..='\u{137F}' | '\u{1380}'..='\u{139F}' | '\u{2D80}'..='\u{2DDF}')
}

pub fn contains_amharic(text: &str) -> bool {
    text.chars().any(is_ethiopic)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralStyle {
    #[default]
    Arabic,
    Geez,
}

/// Fills in whichever language slot is missing.
///
/// Explicit input in a language always wins over anything derived from the
/// other language. The derived side comes from the dictionary when the
/// field has a vocabulary and an entry exists; otherwise it mirrors the
/// supplied text unchanged.
#[derive(Debug, Clone)]
pub struct BilingualResolver {
    dictionary: Arc<Dictionary>,
    numerals: NumeralStyle,
}

impl BilingualResolver {
    pub fn new(dictionary: Arc<Dictionary>, numerals: NumeralStyle) -> Self {
        Self {
            dictionary,
            numerals,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn numerals(&self) -> NumeralStyle {
        self.numerals
    }

    pub fn resolve(
        &self,
        value_en: &str,
        value_am: &str,
        vocabulary: Option<Vocabulary>,
    ) -> BilingualText {
        let en_in = value_en.trim();
        let am_in = value_am.trim();

        // Slot the inputs by script, so text typed into the wrong language
        // field still lands where it belongs.
        let latin = [en_in, am_in]
            .into_iter()
            .find(|v| !v.is_empty() && !contains_amharic(v));
        let ethiopic = [am_in, en_in]
            .into_iter()
            .find(|v| !v.is_empty() && contains_amharic(v));

        let lookup_en =
            |text: &str| vocabulary.and_then(|voc| self.dictionary.to_amharic(voc, text));
        let lookup_am =
            |text: &str| vocabulary.and_then(|voc| self.dictionary.to_english(voc, text));

        let en = match (latin, ethiopic) {
            (Some(text), _) => lookup_en(text).map_or_else(|| text.to_string(), |e| e.en.clone()),
            (None, Some(text)) => {
                lookup_am(text).map_or_else(|| text.to_string(), |e| e.en.clone())
            }
            (None, None) => String::new(),
        };
        let am = match (ethiopic, latin) {
            (Some(text), _) => text.to_string(),
            (None, Some(text)) => {
                lookup_en(text).map_or_else(|| text.to_string(), |e| e.am.clone())
            }
            (None, None) => String::new(),
        };

        BilingualText { en, am }
    }

    /// Like [`resolve`](Self::resolve) for ages, counts and years. The
    /// Amharic slot gets Ge'ez numerals when configured, unless the caller
    /// supplied Amharic text explicitly.
    pub fn resolve_number(&self, value_en: &str, value_am: &str) -> BilingualText {
        let explicit_am = contains_amharic(value_am) || contains_amharic(value_en);
        let mut text = self.resolve(value_en, value_am, None);
        if !explicit_am {
            text.am = self.localize_digits(&text.am);
        }
        text
    }

    /// Applies the configured numeral style to generated Amharic text.
    pub fn localize_digits(&self, text: &str) -> String {
        match self.numerals {
            NumeralStyle::Arabic => text.to_string(),
            NumeralStyle::Geez => numerals::transliterate_digits(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolver() -> BilingualResolver {
        BilingualResolver::new(Arc::new(Dictionary::builtin()), NumeralStyle::Arabic)
    }

    #[test]
    fn classifies_ethiopic_ranges() {
        assert!(contains_amharic("አበበ"));
        assert!(contains_amharic("ID ፩"));
        assert!(contains_amharic("\u{2D80}"));
        assert!(!contains_amharic("Abebe 12"));
    }

    #[test]
    fn english_only_translates_through_dictionary() {
        let text = resolver().resolve("male", "", Some(Vocabulary::Sex));
        assert_eq!(text, BilingualText::new("Male", "ወንድ"));
    }

    #[test]
    fn english_only_without_entry_mirrors() {
        let text = resolver().resolve("Abebe Kebede", "", None);
        assert_eq!(text, BilingualText::new("Abebe Kebede", "Abebe Kebede"));
        let text = resolver().resolve("Atlantis", "", Some(Vocabulary::Place));
        assert_eq!(text, BilingualText::new("Atlantis", "Atlantis"));
    }

    #[test]
    fn amharic_only_reverse_translates_or_mirrors() {
        let r = resolver();
        assert_eq!(
            r.resolve("", "አዲስ አበባ", Some(Vocabulary::Place)),
            BilingualText::new("Addis Ababa", "አዲስ አበባ")
        );
        assert_eq!(r.resolve("", "አበበ", None), BilingualText::new("አበበ", "አበበ"));
    }

    #[test]
    fn swapped_inputs_are_corrected() {
        let text = resolver().resolve("አበበ", "Abebe", None);
        assert_eq!(text, BilingualText::new("Abebe", "አበበ"));
    }

    #[test]
    fn explicit_amharic_beats_dictionary() {
        let text = resolver().resolve("Male", "ተባዕት", Some(Vocabulary::Sex));
        assert_eq!(text, BilingualText::new("Male", "ተባዕት"));
    }

    #[test]
    fn amharic_slot_with_latin_text_is_treated_as_english() {
        let text = resolver().resolve("", "female", Some(Vocabulary::Sex));
        assert_eq!(text, BilingualText::new("Female", "ሴት"));
    }

    #[test]
    fn both_empty_stays_empty() {
        assert!(resolver().resolve("  ", "", Some(Vocabulary::Place)).is_empty());
    }

    #[test]
    fn numbers_use_configured_numerals() {
        let arabic = resolver();
        assert_eq!(arabic.resolve_number("34", ""), BilingualText::new("34", "34"));

        let geez = BilingualResolver::new(Arc::new(Dictionary::empty()), NumeralStyle::Geez);
        assert_eq!(geez.resolve_number("34", ""), BilingualText::new("34", "፴፬"));
        assert_eq!(geez.resolve_number("34", "፴፬ ዓመት"), BilingualText::new("34", "፴፬ ዓመት"));
    }

    proptest! {
        #[test]
        fn completes_any_non_empty_input(en in "\\PC{0,12}", am in "[\u{1200}-\u{137F} ]{0,8}") {
            let text = resolver().resolve(&en, &am, Some(Vocabulary::Place));
            let any_input = !en.trim().is_empty() || !am.trim().is_empty();
            prop_assert_eq!(!text.en.is_empty(), any_input);
            prop_assert_eq!(!text.am.is_empty(), any_input);
        }
    }
}
