use std::collections::BTreeMap;

use serde::Serialize;

use crate::bilingual::{numerals, BilingualText, NumeralStyle};
use crate::calendar::DualDate;
use crate::event::EventType;

use super::layouts::PhotoSlot;

/// Fully-resolved certificate content for one generation call.
///
/// Built only by [`RecordNormalizer`](super::RecordNormalizer) and read-only
/// afterwards. Every text field already carries both languages; every date
/// carries both calendars or is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCertificateRecord {
    event_type: EventType,
    title: BilingualText,
    identifiers: BTreeMap<String, String>,
    text: BTreeMap<String, BilingualText>,
    dates: BTreeMap<String, Option<DualDate>>,
    photos: BTreeMap<PhotoSlot, String>,
    numerals: NumeralStyle,
}

impl CanonicalCertificateRecord {
    pub(super) fn new(event_type: EventType, title: BilingualText, numerals: NumeralStyle) -> Self {
        Self {
            event_type,
            title,
            identifiers: BTreeMap::new(),
            text: BTreeMap::new(),
            dates: BTreeMap::new(),
            photos: BTreeMap::new(),
            numerals,
        }
    }

    pub(super) fn set_identifier(&mut self, key: &str, value: String) {
        self.identifiers.insert(key.to_string(), value);
    }

    pub(super) fn set_text(&mut self, key: &str, value: BilingualText) {
        self.text.insert(key.to_string(), value);
    }

    pub(super) fn set_date(&mut self, key: &str, value: Option<DualDate>) {
        self.dates.insert(key.to_string(), value);
    }

    pub(super) fn set_photo(&mut self, slot: PhotoSlot, stored_name: String) {
        self.photos.insert(slot, stored_name);
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn title(&self) -> &BilingualText {
        &self.title
    }

    pub fn identifier(&self, key: &str) -> Option<&str> {
        self.identifiers.get(key).map(String::as_str)
    }

    pub fn text(&self, key: &str) -> Option<&BilingualText> {
        self.text.get(key)
    }

    pub fn date(&self, key: &str) -> Option<&DualDate> {
        self.dates.get(key).and_then(Option::as_ref)
    }

    /// Stored photo references, still unresolved against the uploads folder.
    pub fn photos(&self) -> impl Iterator<Item = (PhotoSlot, &str)> {
        self.photos.iter().map(|(slot, name)| (*slot, name.as_str()))
    }

    /// Template identifiers and their display strings.
    ///
    /// Text field `x` yields `x` (English), `xEn` and `xAm`. Date field `d`
    /// yields `d`, `dEc`, `dGc`, `dEcEn`, `dEcAm`, `dGcEn` and `dGcAm`; all
    /// empty when the date could not be read.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        out.insert("eventType".to_string(), self.event_type.as_str().to_string());

        for (key, value) in &self.identifiers {
            out.insert(key.clone(), value.clone());
        }

        for (key, value) in &self.text {
            out.insert(key.clone(), value.en.clone());
            out.insert(format!("{key}En"), value.en.clone());
            out.insert(format!("{key}Am"), value.am.clone());
        }

        for (key, date) in &self.dates {
            let forms = match date {
                Some(d) => [
                    d.ec_numeric(),
                    d.ec_numeric(),
                    d.gc_numeric(),
                    d.ec_long_en(),
                    self.localize(&d.ec_long_am()),
                    d.gc_long_en(),
                    self.localize(&d.gc_long_am()),
                ],
                None => Default::default(),
            };
            let suffixes = ["", "Ec", "Gc", "EcEn", "EcAm", "GcEn", "GcAm"];
            for (suffix, form) in suffixes.iter().zip(forms) {
                out.insert(format!("{key}{suffix}"), form);
            }
        }
        out
    }

    fn localize(&self, text: &str) -> String {
        match self.numerals {
            NumeralStyle::Arabic => text.to_string(),
            NumeralStyle::Geez => numerals::transliterate_digits(text),
        }
    }
}
