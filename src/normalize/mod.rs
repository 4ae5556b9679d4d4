//! Source record → canonical certificate record.

pub mod aliases;
pub mod layouts;
mod record;

pub use layouts::{layout_for, PhotoSlot, RecordLayout};
pub use record::CanonicalCertificateRecord;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::bilingual::{BilingualResolver, BilingualText, Vocabulary};
use crate::calendar::{parse_date_value, DateInterpretations, DualDate};
use crate::event::{EventType, SourceRecord};

use aliases::{first_non_empty, first_text, joined_parts};
use layouts::{
    AddressField, DateField, NameField, ADDRESS_PARTS, COMMON_DATES, COMMON_IDENTIFIERS,
    COMMON_TEXTS,
};

/// Facts about this issuance that do not come from the source record.
#[derive(Debug, Clone)]
pub struct IssueContext {
    pub certificate_id: String,
    pub event_id: String,
    pub request_id: String,
    pub issued_by: String,
    /// System date of issue, Gregorian.
    pub issued_on: NaiveDate,
    /// When the event was stored, used if the record has no registration date.
    pub registered_on: Option<NaiveDate>,
}

/// Maps loosely-keyed source records onto canonical certificate fields.
///
/// Pure: the same inputs always give the same record. Fields that cannot be
/// resolved come out empty instead of failing the call.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    resolver: BilingualResolver,
}

impl RecordNormalizer {
    pub fn new(resolver: BilingualResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &BilingualResolver {
        &self.resolver
    }

    pub fn normalize(
        &self,
        source: &SourceRecord,
        event_type: EventType,
        ctx: &IssueContext,
    ) -> CanonicalCertificateRecord {
        let layout = layout_for(event_type);
        let mut record = CanonicalCertificateRecord::new(
            event_type,
            BilingualText::new(layout.title_en, layout.title_am),
            self.resolver.numerals(),
        );

        record.set_identifier("certificateId", ctx.certificate_id.clone());
        record.set_identifier("eventId", ctx.event_id.clone());
        record.set_identifier("requestId", ctx.request_id.clone());
        record.set_identifier("issuedBy", ctx.issued_by.clone());
        for field in COMMON_IDENTIFIERS.iter().chain(layout.identifiers) {
            let value = first_text(source, field.aliases).unwrap_or_default();
            record.set_identifier(field.key, value);
        }

        for field in layout.names {
            record.set_text(field.key, self.name(source, field));
        }

        for field in COMMON_TEXTS.iter().chain(layout.texts) {
            let en = first_text(source, field.en).unwrap_or_default();
            let am = first_text(source, field.am).unwrap_or_default();
            record.set_text(field.key, self.resolver.resolve(&en, &am, field.vocabulary));
        }

        for field in layout.numbers {
            let en = first_text(source, field.en).unwrap_or_default();
            let am = first_text(source, field.am).unwrap_or_default();
            record.set_text(field.key, self.resolver.resolve_number(&en, &am));
        }

        for field in layout.addresses {
            let (parts, combined) = self.address(source, field);
            for (part, value) in parts {
                record.set_text(&format!("{}{}", field.key, part), value);
            }
            if let Some(target) = field.fills {
                let filled = record.text(target).is_some_and(|t| !t.is_empty());
                if !filled && !combined.is_empty() {
                    debug!(field = target, "using combined address");
                    record.set_text(target, combined.clone());
                }
            }
            record.set_text(field.key, combined);
        }

        for field in COMMON_DATES.iter().chain(layout.dates) {
            record.set_date(field.key, date(source, field));
        }
        if record.date("registrationDate").is_none() {
            if let Some(stored) = ctx.registered_on {
                record.set_date("registrationDate", DualDate::from_naive(stored).ok());
            }
        }
        record.set_date("issuedDate", DualDate::from_naive(ctx.issued_on).ok());

        for field in layout.photos {
            if let Some(stored) = first_text(source, field.aliases) {
                record.set_photo(field.slot, stored);
            }
        }

        record
    }

    fn name(&self, source: &SourceRecord, field: &NameField) -> BilingualText {
        let en = first_text(source, field.en)
            .or_else(|| joined_parts(source, field.en_parts))
            .unwrap_or_default();
        let am = first_text(source, field.am)
            .or_else(|| joined_parts(source, field.am_parts))
            .unwrap_or_default();
        self.resolver.resolve(&en, &am, None)
    }

    /// Resolves each address part per language, then joins the non-empty
    /// parts into one display value.
    fn address(
        &self,
        source: &SourceRecord,
        field: &AddressField,
    ) -> (Vec<(&'static str, BilingualText)>, BilingualText) {
        let mut parts = Vec::with_capacity(ADDRESS_PARTS.len());
        for (part, suffixes) in ADDRESS_PARTS {
            let keys = |lang: &str| -> Vec<String> {
                field
                    .prefixes
                    .iter()
                    .flat_map(|prefix| {
                        suffixes
                            .iter()
                            .map(move |suffix| format!("{prefix}{suffix}{lang}"))
                    })
                    .collect()
            };
            let mut en_keys = keys("En");
            en_keys.extend(keys(""));
            let en = first_text(source, &en_keys).unwrap_or_default();
            let am = first_text(source, keys("Am")).unwrap_or_default();
            parts.push((*part, self.resolver.resolve(&en, &am, Some(Vocabulary::Place))));
        }

        let join = |pick: fn(&BilingualText) -> &str, sep: &str| {
            parts
                .iter()
                .map(|(_, text)| pick(text))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(sep)
        };
        let combined = BilingualText::new(join(|t| &t.en, ", "), join(|t| &t.am, "፣ "));
        (parts, combined)
    }
}

fn date(source: &SourceRecord, field: &DateField) -> Option<DualDate> {
    let (alias, value) = first_non_empty(source, field.aliases)?;
    match parse_date_value(value) {
        Ok(raw) => {
            let selected = DateInterpretations::of(raw).select(field.origin);
            if selected.is_none() {
                warn!(
                    field = field.key,
                    alias = %alias,
                    origin = ?field.origin,
                    "date out of range, leaving blank"
                );
            }
            selected
        }
        Err(err) => {
            warn!(
                field = field.key,
                alias = %alias,
                error = %err,
                "unreadable date, leaving blank"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::bilingual::{Dictionary, NumeralStyle};
    use crate::calendar::EthiopianDate;

    fn normalizer() -> RecordNormalizer {
        RecordNormalizer::new(BilingualResolver::new(
            Arc::new(Dictionary::builtin()),
            NumeralStyle::Arabic,
        ))
    }

    fn ctx() -> IssueContext {
        IssueContext {
            certificate_id: "CERT-1".into(),
            event_id: "ev-1".into(),
            request_id: "req-1".into(),
            issued_by: "Registrar One".into(),
            issued_on: NaiveDate::from_ymd_opt(2024, 9, 11).unwrap(),
            registered_on: Some(NaiveDate::from_ymd_opt(2021, 12, 22).unwrap()),
        }
    }

    fn source(value: Value) -> SourceRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn birth_scenario() {
        let record = normalizer().normalize(
            &source(json!({
                "childNameEn": "Abebe Kebede",
                "sex": "male",
                "childBirthDate": "2014-04-12"
            })),
            EventType::Birth,
            &ctx(),
        );

        assert_eq!(record.text("childSex").unwrap(), &BilingualText::new("Male", "ወንድ"));
        assert_eq!(
            record.text("childName").unwrap(),
            &BilingualText::new("Abebe Kebede", "Abebe Kebede")
        );
        let born = record.date("childBirthDate").unwrap();
        assert_eq!(born.ec, EthiopianDate::new(2014, 4, 12).unwrap());
        assert_eq!(born.gc, NaiveDate::from_ymd_opt(2021, 12, 21).unwrap());
        assert_eq!(record.title().en, "Birth Certificate");
    }

    #[test]
    fn higher_priority_alias_wins() {
        let record = normalizer().normalize(
            &source(json!({"birthPlace": "B", "childBirthPlace": "A"})),
            EventType::Birth,
            &ctx(),
        );
        assert_eq!(record.text("childBirthPlace").unwrap().en, "A");
    }

    #[test]
    fn missing_fields_normalize_to_empty() {
        let record = normalizer().normalize(&SourceRecord::new(), EventType::Death, &ctx());
        assert!(record.text("deceasedName").unwrap().is_empty());
        assert_eq!(record.identifier("registrationNumber"), Some(""));
        assert!(record.date("deathDate").is_none());
        assert_eq!(record.flatten()["deathDateGc"], "");
        assert_eq!(record.photos().count(), 0);
    }

    #[test]
    fn malformed_date_degrades_to_blank() {
        let record = normalizer().normalize(
            &source(json!({"childBirthDate": "2014-14-40"})),
            EventType::Birth,
            &ctx(),
        );
        assert!(record.date("childBirthDate").is_none());
    }

    #[test]
    fn issued_date_is_gregorian_and_registration_falls_back_to_storage_date() {
        let record = normalizer().normalize(&SourceRecord::new(), EventType::Birth, &ctx());
        let issued = record.date("issuedDate").unwrap();
        assert_eq!(issued.gc, NaiveDate::from_ymd_opt(2024, 9, 11).unwrap());
        assert_eq!(issued.ec, EthiopianDate::new(2017, 1, 1).unwrap());
        assert_eq!(
            record.date("registrationDate").unwrap().gc,
            NaiveDate::from_ymd_opt(2021, 12, 22).unwrap()
        );
    }

    #[test]
    fn composite_address_resolves_per_language_and_fills_place() {
        let record = normalizer().normalize(
            &source(json!({
                "birthPlaceRegion": "Addis Ababa",
                "birthPlaceSubCity": "Bole",
                "birthPlaceWoredaAm": "ወረዳ 03",
                "birthPlaceWoreda": "Woreda 03"
            })),
            EventType::Birth,
            &ctx(),
        );
        assert_eq!(
            record.text("birthAddressRegion").unwrap(),
            &BilingualText::new("Addis Ababa", "አዲስ አበባ")
        );
        let combined = record.text("birthAddress").unwrap();
        assert_eq!(combined.en, "Addis Ababa, Bole, Woreda 03");
        assert_eq!(combined.am, "አዲስ አበባ፣ ቦሌ፣ ወረዳ 03");
        assert_eq!(record.text("childBirthPlace").unwrap(), combined);
    }

    #[test]
    fn explicit_place_is_not_overwritten_by_address() {
        let record = normalizer().normalize(
            &source(json!({"placeOfBirthEn": "Adama", "birthPlaceRegion": "Oromia"})),
            EventType::Birth,
            &ctx(),
        );
        assert_eq!(record.text("childBirthPlace").unwrap().am, "አዳማ");
        assert_eq!(record.text("birthAddress").unwrap().en, "Oromia");
    }

    #[test]
    fn marriage_photos_and_names_from_parts() {
        let record = normalizer().normalize(
            &source(json!({
                "groomFirstName": "Dawit",
                "groomLastName": "Haile",
                "wifeNameAm": "ሰላም",
                "groomPhoto": "groomPhoto-123.jpg",
                "bridePhoto": {"filename": "bridePhoto-456.png"},
                "marriageDate": "05/02/2016",
                "groomReligion": "orthodox christian"
            })),
            EventType::Marriage,
            &ctx(),
        );
        assert_eq!(record.text("groomName").unwrap().en, "Dawit Haile");
        assert_eq!(record.text("brideName").unwrap(), &BilingualText::new("ሰላም", "ሰላም"));
        assert_eq!(
            record.text("groomReligion").unwrap(),
            &BilingualText::new("Orthodox", "ኦርቶዶክስ")
        );
        let photos: Vec<_> = record.photos().collect();
        assert_eq!(
            photos,
            vec![
                (PhotoSlot::Primary, "groomPhoto-123.jpg"),
                (PhotoSlot::Secondary, "bridePhoto-456.png")
            ]
        );
        assert_eq!(
            record.date("marriageDate").unwrap().ec,
            EthiopianDate::new(2016, 2, 5).unwrap()
        );
    }

    #[test]
    fn divorce_identifiers_and_numbers() {
        let record = normalizer().normalize(
            &source(json!({"caseNumber": "FC-77/2016", "childrenCount": 2, "regNo": "AA-0042"})),
            EventType::Divorce,
            &ctx(),
        );
        assert_eq!(record.identifier("decreeNumber"), Some("FC-77/2016"));
        assert_eq!(record.identifier("registrationNumber"), Some("AA-0042"));
        assert_eq!(record.text("numberOfChildren").unwrap(), &BilingualText::new("2", "2"));
    }

    #[test]
    fn flatten_exposes_language_and_calendar_variants() {
        let record = normalizer().normalize(
            &source(json!({"childNameAm": "አበበ", "childBirthDate": "2014-04-12"})),
            EventType::Birth,
            &ctx(),
        );
        let flat = record.flatten();
        assert_eq!(flat["childNameAm"], "አበበ");
        assert_eq!(flat["childBirthDateEc"], "12/04/2014");
        assert_eq!(flat["childBirthDateGc"], "21/12/2021");
        assert_eq!(flat["childBirthDateEcAm"], "ታኅሣሥ 12 ቀን 2014 ዓ.ም.");
        assert_eq!(flat["certificateId"], "CERT-1");
        assert_eq!(flat["eventType"], "birth");
    }

    #[test]
    fn geez_numerals_reach_amharic_dates() {
        let normalizer = RecordNormalizer::new(BilingualResolver::new(
            Arc::new(Dictionary::builtin()),
            NumeralStyle::Geez,
        ));
        let record = normalizer.normalize(
            &source(json!({"childBirthDate": "2014-04-12", "fatherAge": "34"})),
            EventType::Birth,
            &ctx(),
        );
        let flat = record.flatten();
        assert_eq!(flat["childBirthDateEcAm"], "ታኅሣሥ ፲፪ ቀን ፳፻፲፬ ዓ.ም.");
        assert_eq!(flat["childBirthDateEc"], "12/04/2014");
        assert_eq!(flat["fatherAgeAm"], "፴፬");
    }
}
