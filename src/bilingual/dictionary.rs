use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Closed vocabularies the dictionary can translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Vocabulary {
    Place,
    Nationality,
    Sex,
    MaritalStatus,
    Religion,
    MarriageType,
}

/// Canonical English display form and its Amharic counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub en: String,
    pub am: String,
}

/// Static English ↔ Amharic lookup tables, built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    forward: HashMap<(Vocabulary, String), Entry>,
    reverse: HashMap<(Vocabulary, String), Entry>,
}

/// Shape of the optional extension file: `{"place": {"Bishoftu": "ቢሾፍቱ"}}`.
pub type DictionaryFile = BTreeMap<Vocabulary, BTreeMap<String, String>>;

const SEX: &[(&str, &str)] = &[("Male", "ወንድ"), ("Female", "ሴት")];

const SEX_SYNONYMS: &[(&str, &str)] = &[
    ("m", "Male"),
    ("man", "Male"),
    ("f", "Female"),
    ("woman", "Female"),
];

const MARITAL_STATUS: &[(&str, &str)] = &[
    ("Single", "ያላገባ"),
    ("Married", "ያገባ"),
    ("Divorced", "የተፋታ"),
    ("Widowed", "የትዳር አጋሩ የሞተበት"),
];

const MARITAL_SYNONYMS: &[(&str, &str)] = &[
    ("never married", "Single"),
    ("unmarried", "Single"),
    ("widow", "Widowed"),
    ("widower", "Widowed"),
];

const RELIGION: &[(&str, &str)] = &[
    ("Orthodox", "ኦርቶዶክስ"),
    ("Muslim", "ሙስሊም"),
    ("Protestant", "ፕሮቴስታንት"),
    ("Catholic", "ካቶሊክ"),
    ("Traditional", "ባህላዊ እምነት"),
    ("Other", "ሌላ"),
];

const RELIGION_SYNONYMS: &[(&str, &str)] = &[
    ("orthodox christian", "Orthodox"),
    ("ethiopian orthodox", "Orthodox"),
    ("islam", "Muslim"),
    ("pentecostal", "Protestant"),
    ("evangelical", "Protestant"),
];

const NATIONALITY: &[(&str, &str)] = &[
    ("Ethiopian", "ኢትዮጵያዊ"),
    ("Eritrean", "ኤርትራዊ"),
    ("Kenyan", "ኬንያዊ"),
    ("Somali", "ሶማሊያዊ"),
    ("Sudanese", "ሱዳናዊ"),
    ("South Sudanese", "ደቡብ ሱዳናዊ"),
    ("Djiboutian", "ጅቡቲያዊ"),
    ("American", "አሜሪካዊ"),
    ("British", "እንግሊዛዊ"),
    ("Other", "ሌላ"),
];

const NATIONALITY_SYNONYMS: &[(&str, &str)] = &[
    ("ethiopia", "Ethiopian"),
    ("eritrea", "Eritrean"),
    ("kenya", "Kenyan"),
];

const MARRIAGE_TYPE: &[(&str, &str)] = &[
    ("Civil", "በክብር መዝገብ"),
    ("Religious", "ሃይማኖታዊ"),
    ("Customary", "ባህላዊ"),
];

const PLACE: &[(&str, &str)] = &[
    ("Ethiopia", "ኢትዮጵያ"),
    ("Addis Ababa", "አዲስ አበባ"),
    ("Dire Dawa", "ድሬዳዋ"),
    ("Oromia", "ኦሮሚያ"),
    ("Amhara", "አማራ"),
    ("Tigray", "ትግራይ"),
    ("Afar", "አፋር"),
    ("Somali", "ሶማሌ"),
    ("Sidama", "ሲዳማ"),
    ("Harari", "ሐረሪ"),
    ("Gambela", "ጋምቤላ"),
    ("Benishangul Gumuz", "ቤኒሻንጉል ጉሙዝ"),
    ("Central Ethiopia", "ማዕከላዊ ኢትዮጵያ"),
    ("South Ethiopia", "ደቡብ ኢትዮጵያ"),
    ("South West Ethiopia", "ደቡብ ምዕራብ ኢትዮጵያ"),
    ("Bahir Dar", "ባሕር ዳር"),
    ("Gondar", "ጎንደር"),
    ("Mekelle", "መቀሌ"),
    ("Hawassa", "ሀዋሳ"),
    ("Adama", "አዳማ"),
    ("Jimma", "ጅማ"),
    ("Dessie", "ደሴ"),
    ("Harar", "ሐረር"),
    ("Bishoftu", "ቢሾፍቱ"),
    ("Arba Minch", "አርባ ምንጭ"),
    ("Bole", "ቦሌ"),
    ("Yeka", "የካ"),
    ("Kirkos", "ቂርቆስ"),
    ("Arada", "አራዳ"),
    ("Lideta", "ልደታ"),
    ("Gulele", "ጉለሌ"),
    ("Kolfe Keranio", "ኮልፌ ቀራኒዮ"),
    ("Nifas Silk Lafto", "ንፋስ ስልክ ላፍቶ"),
    ("Akaki Kality", "አቃቂ ቃሊቲ"),
    ("Addis Ketema", "አዲስ ከተማ"),
    ("Lemi Kura", "ለሚ ኩራ"),
];

const PLACE_SYNONYMS: &[(&str, &str)] = &[
    ("addis abeba", "Addis Ababa"),
    ("finfinne", "Addis Ababa"),
    ("mekele", "Mekelle"),
    ("awassa", "Hawassa"),
    ("nazret", "Adama"),
    ("gonder", "Gondar"),
    ("debre zeyit", "Bishoftu"),
];

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in tables for sex, marital status, religion, nationality,
    /// marriage type and the common administrative place names.
    pub fn builtin() -> Self {
        let mut dict = Self::default();
        let tables: [(Vocabulary, &[(&str, &str)], &[(&str, &str)]); 6] = [
            (Vocabulary::Sex, SEX, SEX_SYNONYMS),
            (Vocabulary::MaritalStatus, MARITAL_STATUS, MARITAL_SYNONYMS),
            (Vocabulary::Religion, RELIGION, RELIGION_SYNONYMS),
            (Vocabulary::Nationality, NATIONALITY, NATIONALITY_SYNONYMS),
            (Vocabulary::MarriageType, MARRIAGE_TYPE, &[]),
            (Vocabulary::Place, PLACE, PLACE_SYNONYMS),
        ];
        for (vocabulary, entries, synonyms) in tables {
            for (en, am) in entries {
                dict.insert(vocabulary, en, am);
            }
            for (alias, en) in synonyms {
                dict.alias(vocabulary, alias, en);
            }
        }
        dict
    }

    /// Built-in tables extended by a JSON file. Later entries win.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let mut dict = Self::builtin();
        let raw = std::fs::read_to_string(path)?;
        let added = dict.extend_from_json(&raw)?;
        tracing::info!(path = %path.display(), entries = added, "loaded dictionary extension");
        Ok(dict)
    }

    pub fn extend_from_json(&mut self, raw: &str) -> Result<usize, serde_json::Error> {
        let file: DictionaryFile = serde_json::from_str(raw)?;
        let mut added = 0;
        for (vocabulary, entries) in file {
            for (en, am) in entries {
                self.insert(vocabulary, &en, &am);
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn insert(&mut self, vocabulary: Vocabulary, en: &str, am: &str) {
        let entry = Entry {
            en: en.trim().to_string(),
            am: am.trim().to_string(),
        };
        self.forward
            .insert((vocabulary, normalize_key(en)), entry.clone());
        self.reverse.insert((vocabulary, normalize_key(am)), entry);
    }

    /// Makes `alias` look up the entry already stored under `en`.
    pub fn alias(&mut self, vocabulary: Vocabulary, alias: &str, en: &str) {
        if let Some(entry) = self.forward.get(&(vocabulary, normalize_key(en))).cloned() {
            self.forward.insert((vocabulary, normalize_key(alias)), entry);
        }
    }

    pub fn to_amharic(&self, vocabulary: Vocabulary, en: &str) -> Option<&Entry> {
        self.forward.get(&(vocabulary, normalize_key(en)))
    }

    pub fn to_english(&self, vocabulary: Vocabulary, am: &str) -> Option<&Entry> {
        self.reverse.get(&(vocabulary, normalize_key(am)))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Case-folds and treats `-`, `_` and runs of whitespace as one space.
fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_and_separators() {
        let dict = Dictionary::builtin();
        let entry = dict.to_amharic(Vocabulary::Place, "benishangul-gumuz").unwrap();
        assert_eq!(entry.en, "Benishangul Gumuz");
        assert_eq!(entry.am, "ቤኒሻንጉል ጉሙዝ");
        assert_eq!(dict.to_amharic(Vocabulary::Sex, "MALE").unwrap().am, "ወንድ");
    }

    #[test]
    fn synonyms_resolve_to_canonical_entry() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.to_amharic(Vocabulary::Sex, "f").unwrap().en, "Female");
        assert_eq!(dict.to_amharic(Vocabulary::Place, "Finfinne").unwrap().am, "አዲስ አበባ");
    }

    #[test]
    fn vocabularies_are_separate() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.to_amharic(Vocabulary::Place, "Somali").unwrap().am, "ሶማሌ");
        assert_eq!(dict.to_amharic(Vocabulary::Nationality, "Somali").unwrap().am, "ሶማሊያዊ");
        assert!(dict.to_amharic(Vocabulary::Religion, "Male").is_none());
    }

    #[test]
    fn reverse_lookup() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.to_english(Vocabulary::Sex, "ሴት").unwrap().en, "Female");
    }

    #[test]
    fn json_extension_overrides_and_adds() {
        let mut dict = Dictionary::builtin();
        let added = dict
            .extend_from_json(r#"{"place": {"Debre Markos": "ደብረ ማርቆስ"}, "sex": {"Male": "ወ"}}"#)
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(dict.to_amharic(Vocabulary::Place, "debre markos").unwrap().am, "ደብረ ማርቆስ");
        assert_eq!(dict.to_amharic(Vocabulary::Sex, "male").unwrap().am, "ወ");
    }
}
