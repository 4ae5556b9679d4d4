//! Declarative field tables, one per event type.
//!
//! Every alias list is ordered: the first key with a non-empty value wins.
//! Adding a new spelling of a field is a change to these tables only.

use serde::Serialize;

use crate::bilingual::Vocabulary;
use crate::calendar::DateOrigin;
use crate::event::EventType;

pub struct IdentifierField {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
}

pub struct TextField {
    pub key: &'static str,
    pub en: &'static [&'static str],
    pub am: &'static [&'static str],
    pub vocabulary: Option<Vocabulary>,
}

/// A person's full name, or its given/father/grandfather parts.
pub struct NameField {
    pub key: &'static str,
    pub en: &'static [&'static str],
    pub am: &'static [&'static str],
    pub en_parts: &'static [&'static [&'static str]],
    pub am_parts: &'static [&'static [&'static str]],
}

pub struct NumberField {
    pub key: &'static str,
    pub en: &'static [&'static str],
    pub am: &'static [&'static str],
}

pub struct DateField {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub origin: DateOrigin,
}

/// Region/zone/city/sub-city/woreda/kebele, probed under each prefix as
/// `{prefix}{Part}En`, `{prefix}{Part}` and `{prefix}{Part}Am`.
pub struct AddressField {
    pub key: &'static str,
    pub prefixes: &'static [&'static str],
    /// Text field that shows the combined address when it has no value.
    pub fills: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoSlot {
    Primary,
    Secondary,
}

impl PhotoSlot {
    /// Template token for this slot.
    pub fn token(self) -> &'static str {
        match self {
            Self::Primary => "photoPrimary",
            Self::Secondary => "photoSecondary",
        }
    }
}

pub struct PhotoField {
    pub slot: PhotoSlot,
    pub aliases: &'static [&'static str],
}

pub struct RecordLayout {
    pub event_type: EventType,
    pub title_en: &'static str,
    pub title_am: &'static str,
    pub identifiers: &'static [IdentifierField],
    pub names: &'static [NameField],
    pub texts: &'static [TextField],
    pub numbers: &'static [NumberField],
    pub dates: &'static [DateField],
    pub addresses: &'static [AddressField],
    pub photos: &'static [PhotoField],
}

/// Address parts with the suffixes each may be stored under.
pub const ADDRESS_PARTS: &[(&str, &[&str])] = &[
    ("Region", &["Region"]),
    ("Zone", &["Zone"]),
    ("City", &["City", "Town"]),
    ("SubCity", &["SubCity", "Subcity"]),
    ("Woreda", &["Woreda"]),
    ("Kebele", &["Kebele"]),
];

pub const COMMON_IDENTIFIERS: &[IdentifierField] = &[IdentifierField {
    key: "registrationNumber",
    aliases: &["registrationNumber", "registrationNo", "regNumber", "regNo", "registrationId"],
}];

pub const COMMON_TEXTS: &[TextField] = &[
    TextField {
        key: "registrarName",
        en: &["registrarNameEn", "registrarName", "civilRegistrarName", "registrar"],
        am: &["registrarNameAm", "civilRegistrarNameAm"],
        vocabulary: None,
    },
    TextField {
        key: "registrationOffice",
        en: &["registrationOfficeEn", "registrationOffice", "registrationPlace", "office"],
        am: &["registrationOfficeAm", "registrationPlaceAm", "officeAm"],
        vocabulary: Some(Vocabulary::Place),
    },
];

pub const COMMON_DATES: &[DateField] = &[DateField {
    key: "registrationDate",
    aliases: &["registrationDate", "dateOfRegistration", "registeredDate", "registeredOn"],
    origin: DateOrigin::Ethiopian,
}];

pub static BIRTH: RecordLayout = RecordLayout {
    event_type: EventType::Birth,
    title_en: "Birth Certificate",
    title_am: "የልደት ምስክር ወረቀት",
    identifiers: &[],
    names: &[
        NameField {
            key: "childName",
            en: &[
                "childNameEn",
                "childFullNameEn",
                "childName",
                "childFullName",
                "fullNameEn",
                "fullName",
            ],
            am: &["childNameAm", "childFullNameAm", "fullNameAm"],
            en_parts: &[
                &["childFirstNameEn", "childFirstName", "firstNameEn", "firstName"],
                &["childMiddleNameEn", "childMiddleName", "middleNameEn", "middleName"],
                &["childLastNameEn", "childLastName", "lastNameEn", "lastName"],
            ],
            am_parts: &[
                &["childFirstNameAm", "firstNameAm"],
                &["childMiddleNameAm", "middleNameAm"],
                &["childLastNameAm", "lastNameAm"],
            ],
        },
        NameField {
            key: "fatherName",
            en: &["fatherNameEn", "fatherFullNameEn", "fatherName", "fatherFullName"],
            am: &["fatherNameAm", "fatherFullNameAm"],
            en_parts: &[],
            am_parts: &[],
        },
        NameField {
            key: "motherName",
            en: &["motherNameEn", "motherFullNameEn", "motherName", "motherFullName"],
            am: &["motherNameAm", "motherFullNameAm"],
            en_parts: &[],
            am_parts: &[],
        },
    ],
    texts: &[
        TextField {
            key: "childSex",
            en: &["childSexEn", "childSex", "sexEn", "sex", "gender"],
            am: &["childSexAm", "sexAm", "genderAm"],
            vocabulary: Some(Vocabulary::Sex),
        },
        TextField {
            key: "childBirthPlace",
            en: &[
                "placeOfBirthEn",
                "childBirthPlace",
                "birthPlace",
                "birthPlaceCity",
                "placeOfBirth",
            ],
            am: &["placeOfBirthAm", "childBirthPlaceAm", "birthPlaceAm", "birthPlaceCityAm"],
            vocabulary: Some(Vocabulary::Place),
        },
        TextField {
            key: "childNationality",
            en: &["childNationalityEn", "childNationality", "nationalityEn", "nationality"],
            am: &["childNationalityAm", "nationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "fatherNationality",
            en: &["fatherNationalityEn", "fatherNationality"],
            am: &["fatherNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "motherNationality",
            en: &["motherNationalityEn", "motherNationality"],
            am: &["motherNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "typeOfBirth",
            en: &["typeOfBirthEn", "typeOfBirth", "birthType"],
            am: &["typeOfBirthAm", "birthTypeAm"],
            vocabulary: None,
        },
    ],
    numbers: &[
        NumberField {
            key: "fatherAge",
            en: &["fatherAge", "fatherAgeAtBirth"],
            am: &["fatherAgeAm"],
        },
        NumberField {
            key: "motherAge",
            en: &["motherAge", "motherAgeAtBirth"],
            am: &["motherAgeAm"],
        },
    ],
    dates: &[DateField {
        key: "childBirthDate",
        aliases: &["childBirthDate", "childDateOfBirth", "dateOfBirth", "birthDate", "dob"],
        origin: DateOrigin::Ethiopian,
    }],
    addresses: &[AddressField {
        key: "birthAddress",
        prefixes: &["childBirthPlace", "birthPlace", "placeOfBirth"],
        fills: Some("childBirthPlace"),
    }],
    photos: &[PhotoField {
        slot: PhotoSlot::Primary,
        aliases: &["childPhoto", "photo", "photoUrl", "image"],
    }],
};

pub static MARRIAGE: RecordLayout = RecordLayout {
    event_type: EventType::Marriage,
    title_en: "Marriage Certificate",
    title_am: "የጋብቻ ምስክር ወረቀት",
    identifiers: &[],
    names: &[
        NameField {
            key: "groomName",
            en: &[
                "groomNameEn",
                "husbandNameEn",
                "groomFullNameEn",
                "groomName",
                "husbandName",
                "groomFullName",
            ],
            am: &["groomNameAm", "husbandNameAm", "groomFullNameAm"],
            en_parts: &[
                &["groomFirstNameEn", "groomFirstName"],
                &["groomMiddleNameEn", "groomMiddleName"],
                &["groomLastNameEn", "groomLastName"],
            ],
            am_parts: &[&["groomFirstNameAm"], &["groomMiddleNameAm"], &["groomLastNameAm"]],
        },
        NameField {
            key: "brideName",
            en: &[
                "brideNameEn",
                "wifeNameEn",
                "brideFullNameEn",
                "brideName",
                "wifeName",
                "brideFullName",
            ],
            am: &["brideNameAm", "wifeNameAm", "brideFullNameAm"],
            en_parts: &[
                &["brideFirstNameEn", "brideFirstName"],
                &["brideMiddleNameEn", "brideMiddleName"],
                &["brideLastNameEn", "brideLastName"],
            ],
            am_parts: &[&["brideFirstNameAm"], &["brideMiddleNameAm"], &["brideLastNameAm"]],
        },
        NameField {
            key: "firstWitnessName",
            en: &["witness1NameEn", "firstWitnessNameEn", "witness1Name", "firstWitnessName"],
            am: &["witness1NameAm", "firstWitnessNameAm"],
            en_parts: &[],
            am_parts: &[],
        },
        NameField {
            key: "secondWitnessName",
            en: &["witness2NameEn", "secondWitnessNameEn", "witness2Name", "secondWitnessName"],
            am: &["witness2NameAm", "secondWitnessNameAm"],
            en_parts: &[],
            am_parts: &[],
        },
    ],
    texts: &[
        TextField {
            key: "groomNationality",
            en: &[
                "groomNationalityEn",
                "husbandNationalityEn",
                "groomNationality",
                "husbandNationality",
            ],
            am: &["groomNationalityAm", "husbandNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "brideNationality",
            en: &["brideNationalityEn", "wifeNationalityEn", "brideNationality", "wifeNationality"],
            am: &["brideNationalityAm", "wifeNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "groomReligion",
            en: &["groomReligionEn", "groomReligion", "husbandReligion"],
            am: &["groomReligionAm", "husbandReligionAm"],
            vocabulary: Some(Vocabulary::Religion),
        },
        TextField {
            key: "brideReligion",
            en: &["brideReligionEn", "brideReligion", "wifeReligion"],
            am: &["brideReligionAm", "wifeReligionAm"],
            vocabulary: Some(Vocabulary::Religion),
        },
        TextField {
            key: "groomPreviousMaritalStatus",
            en: &["groomMaritalStatusEn", "groomPreviousMaritalStatus", "groomMaritalStatus"],
            am: &["groomMaritalStatusAm", "groomPreviousMaritalStatusAm"],
            vocabulary: Some(Vocabulary::MaritalStatus),
        },
        TextField {
            key: "bridePreviousMaritalStatus",
            en: &["brideMaritalStatusEn", "bridePreviousMaritalStatus", "brideMaritalStatus"],
            am: &["brideMaritalStatusAm", "bridePreviousMaritalStatusAm"],
            vocabulary: Some(Vocabulary::MaritalStatus),
        },
        TextField {
            key: "marriagePlace",
            en: &[
                "marriagePlaceEn",
                "placeOfMarriageEn",
                "marriagePlace",
                "placeOfMarriage",
                "marriagePlaceCity",
            ],
            am: &["marriagePlaceAm", "placeOfMarriageAm", "marriagePlaceCityAm"],
            vocabulary: Some(Vocabulary::Place),
        },
        TextField {
            key: "marriageType",
            en: &["marriageTypeEn", "marriageType", "typeOfMarriage"],
            am: &["marriageTypeAm", "typeOfMarriageAm"],
            vocabulary: Some(Vocabulary::MarriageType),
        },
    ],
    numbers: &[
        NumberField {
            key: "groomAge",
            en: &["groomAge", "husbandAge"],
            am: &["groomAgeAm"],
        },
        NumberField {
            key: "brideAge",
            en: &["brideAge", "wifeAge"],
            am: &["brideAgeAm"],
        },
    ],
    dates: &[
        DateField {
            key: "marriageDate",
            aliases: &["marriageDate", "dateOfMarriage", "weddingDate"],
            origin: DateOrigin::Ethiopian,
        },
        DateField {
            key: "groomBirthDate",
            aliases: &["groomBirthDate", "groomDateOfBirth", "husbandBirthDate"],
            origin: DateOrigin::Ethiopian,
        },
        DateField {
            key: "brideBirthDate",
            aliases: &["brideBirthDate", "brideDateOfBirth", "wifeBirthDate"],
            origin: DateOrigin::Ethiopian,
        },
    ],
    addresses: &[AddressField {
        key: "marriageAddress",
        prefixes: &["marriagePlace", "placeOfMarriage"],
        fills: Some("marriagePlace"),
    }],
    photos: &[
        PhotoField {
            slot: PhotoSlot::Primary,
            aliases: &["groomPhoto", "husbandPhoto"],
        },
        PhotoField {
            slot: PhotoSlot::Secondary,
            aliases: &["bridePhoto", "wifePhoto"],
        },
    ],
};

pub static DEATH: RecordLayout = RecordLayout {
    event_type: EventType::Death,
    title_en: "Death Certificate",
    title_am: "የሞት ምስክር ወረቀት",
    identifiers: &[],
    names: &[
        NameField {
            key: "deceasedName",
            en: &[
                "deceasedNameEn",
                "deceasedFullNameEn",
                "deceasedName",
                "deceasedFullName",
                "fullNameEn",
                "fullName",
            ],
            am: &["deceasedNameAm", "deceasedFullNameAm", "fullNameAm"],
            en_parts: &[
                &["deceasedFirstNameEn", "deceasedFirstName", "firstName"],
                &["deceasedMiddleNameEn", "deceasedMiddleName", "middleName"],
                &["deceasedLastNameEn", "deceasedLastName", "lastName"],
            ],
            am_parts: &[
                &["deceasedFirstNameAm", "firstNameAm"],
                &["deceasedMiddleNameAm", "middleNameAm"],
                &["deceasedLastNameAm", "lastNameAm"],
            ],
        },
        NameField {
            key: "informantName",
            en: &["informantNameEn", "informantName", "reporterName"],
            am: &["informantNameAm", "reporterNameAm"],
            en_parts: &[],
            am_parts: &[],
        },
    ],
    texts: &[
        TextField {
            key: "deceasedSex",
            en: &["deceasedSexEn", "deceasedSex", "sexEn", "sex", "gender"],
            am: &["deceasedSexAm", "sexAm", "genderAm"],
            vocabulary: Some(Vocabulary::Sex),
        },
        TextField {
            key: "deceasedNationality",
            en: &["deceasedNationalityEn", "deceasedNationality", "nationalityEn", "nationality"],
            am: &["deceasedNationalityAm", "nationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "deceasedReligion",
            en: &["deceasedReligionEn", "deceasedReligion", "religion"],
            am: &["deceasedReligionAm", "religionAm"],
            vocabulary: Some(Vocabulary::Religion),
        },
        TextField {
            key: "deceasedMaritalStatus",
            en: &["deceasedMaritalStatusEn", "deceasedMaritalStatus", "maritalStatus"],
            am: &["deceasedMaritalStatusAm", "maritalStatusAm"],
            vocabulary: Some(Vocabulary::MaritalStatus),
        },
        TextField {
            key: "deathPlace",
            en: &["placeOfDeathEn", "deathPlaceEn", "deathPlace", "placeOfDeath", "deathPlaceCity"],
            am: &["placeOfDeathAm", "deathPlaceAm", "deathPlaceCityAm"],
            vocabulary: Some(Vocabulary::Place),
        },
        TextField {
            key: "causeOfDeath",
            en: &["causeOfDeathEn", "causeOfDeath", "deathCause"],
            am: &["causeOfDeathAm", "deathCauseAm"],
            vocabulary: None,
        },
    ],
    numbers: &[NumberField {
        key: "deceasedAge",
        en: &["deceasedAge", "ageAtDeath", "age"],
        am: &["deceasedAgeAm", "ageAm"],
    }],
    dates: &[
        DateField {
            key: "deathDate",
            aliases: &["deathDate", "dateOfDeath", "deceasedDeathDate"],
            origin: DateOrigin::Ethiopian,
        },
        DateField {
            key: "deceasedBirthDate",
            aliases: &["deceasedBirthDate", "deceasedDateOfBirth", "dateOfBirth", "birthDate"],
            origin: DateOrigin::Ethiopian,
        },
    ],
    addresses: &[AddressField {
        key: "deathAddress",
        prefixes: &["deathPlace", "placeOfDeath"],
        fills: Some("deathPlace"),
    }],
    photos: &[PhotoField {
        slot: PhotoSlot::Primary,
        aliases: &["deceasedPhoto", "photo", "photoUrl", "image"],
    }],
};

pub static DIVORCE: RecordLayout = RecordLayout {
    event_type: EventType::Divorce,
    title_en: "Divorce Certificate",
    title_am: "የፍቺ ምስክር ወረቀት",
    identifiers: &[IdentifierField {
        key: "decreeNumber",
        aliases: &["decreeNumber", "courtDecreeNumber", "caseNumber", "courtCaseNumber"],
    }],
    names: &[
        NameField {
            key: "husbandName",
            en: &["husbandNameEn", "husbandFullNameEn", "husbandName", "husbandFullName"],
            am: &["husbandNameAm", "husbandFullNameAm"],
            en_parts: &[
                &["husbandFirstNameEn", "husbandFirstName"],
                &["husbandMiddleNameEn", "husbandMiddleName"],
                &["husbandLastNameEn", "husbandLastName"],
            ],
            am_parts: &[&["husbandFirstNameAm"], &["husbandMiddleNameAm"], &["husbandLastNameAm"]],
        },
        NameField {
            key: "wifeName",
            en: &["wifeNameEn", "wifeFullNameEn", "wifeName", "wifeFullName"],
            am: &["wifeNameAm", "wifeFullNameAm"],
            en_parts: &[
                &["wifeFirstNameEn", "wifeFirstName"],
                &["wifeMiddleNameEn", "wifeMiddleName"],
                &["wifeLastNameEn", "wifeLastName"],
            ],
            am_parts: &[&["wifeFirstNameAm"], &["wifeMiddleNameAm"], &["wifeLastNameAm"]],
        },
    ],
    texts: &[
        TextField {
            key: "husbandNationality",
            en: &["husbandNationalityEn", "husbandNationality"],
            am: &["husbandNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "wifeNationality",
            en: &["wifeNationalityEn", "wifeNationality"],
            am: &["wifeNationalityAm"],
            vocabulary: Some(Vocabulary::Nationality),
        },
        TextField {
            key: "divorcePlace",
            en: &[
                "divorcePlaceEn",
                "placeOfDivorceEn",
                "divorcePlace",
                "placeOfDivorce",
                "divorcePlaceCity",
            ],
            am: &["divorcePlaceAm", "placeOfDivorceAm", "divorcePlaceCityAm"],
            vocabulary: Some(Vocabulary::Place),
        },
        TextField {
            key: "courtName",
            en: &["courtNameEn", "courtName", "court"],
            am: &["courtNameAm", "courtAm"],
            vocabulary: None,
        },
        TextField {
            key: "divorceReason",
            en: &["divorceReasonEn", "divorceReason", "reasonForDivorce"],
            am: &["divorceReasonAm", "reasonForDivorceAm"],
            vocabulary: None,
        },
    ],
    numbers: &[
        NumberField {
            key: "numberOfChildren",
            en: &["numberOfChildren", "childrenCount", "commonChildren"],
            am: &["numberOfChildrenAm"],
        },
        NumberField {
            key: "husbandAge",
            en: &["husbandAge"],
            am: &["husbandAgeAm"],
        },
        NumberField {
            key: "wifeAge",
            en: &["wifeAge"],
            am: &["wifeAgeAm"],
        },
    ],
    dates: &[
        DateField {
            key: "divorceDate",
            aliases: &["divorceDate", "dateOfDivorce", "divorceDecreeDate"],
            origin: DateOrigin::Ethiopian,
        },
        DateField {
            key: "marriageDate",
            aliases: &["marriageDate", "dateOfMarriage"],
            origin: DateOrigin::Ethiopian,
        },
    ],
    addresses: &[AddressField {
        key: "divorceAddress",
        prefixes: &["divorcePlace", "placeOfDivorce"],
        fills: Some("divorcePlace"),
    }],
    photos: &[
        PhotoField {
            slot: PhotoSlot::Primary,
            aliases: &["husbandPhoto"],
        },
        PhotoField {
            slot: PhotoSlot::Secondary,
            aliases: &["wifePhoto"],
        },
    ],
};

pub fn layout_for(event_type: EventType) -> &'static RecordLayout {
    match event_type {
        EventType::Birth => &BIRTH,
        EventType::Marriage => &MARRIAGE,
        EventType::Death => &DEATH,
        EventType::Divorce => &DIVORCE,
    }
}
