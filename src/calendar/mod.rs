//! Ethiopian ↔ Gregorian calendar conversion.
//!
//! Both directions go through the Julian Day Number, so there is exactly one
//! offset constant per calendar and a date always survives the round trip.

mod parse;

pub use parse::{parse_date_value, RawDate};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JDN of Meskerem 1, 1 E.C. (Amete Mihret era).
pub const ETHIOPIAN_EPOCH_JDN: i64 = 1_724_221;

/// JDN of the day before 0001-01-01 in the proleptic Gregorian calendar.
const GREGORIAN_CE_OFFSET: i64 = 1_721_425;

const MAX_YEAR: i32 = 9999;

pub const ETHIOPIAN_MONTHS_EN: [&str; 13] = [
    "Meskerem", "Tikimt", "Hidar", "Tahsas", "Tir", "Yekatit", "Megabit", "Miazia", "Ginbot",
    "Sene", "Hamle", "Nehase", "Pagume",
];

pub const ETHIOPIAN_MONTHS_AM: [&str; 13] = [
    "መስከረም", "ጥቅምት", "ኅዳር", "ታኅሣሥ", "ጥር", "የካቲት", "መጋቢት", "ሚያዝያ", "ግንቦት", "ሰኔ", "ሐምሌ",
    "ነሐሴ", "ጳጉሜን",
];

pub const GREGORIAN_MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub const GREGORIAN_MONTHS_AM: [&str; 12] = [
    "ጃንዩወሪ", "ፌብሩወሪ", "ማርች", "ኤፕሪል", "ሜይ", "ጁን", "ጁላይ", "ኦገስት", "ሴፕቴምበር", "ኦክቶበር",
    "ኖቬምበር", "ዲሴምበር",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
    #[error("month {month} is invalid for the {calendar} calendar")]
    InvalidMonth { calendar: &'static str, month: u32 },
    #[error("day {day} is invalid for {calendar} month {month} of year {year}")]
    InvalidDay {
        calendar: &'static str,
        year: i32,
        month: u32,
        day: u32,
    },
    #[error("unparseable date '{0}'")]
    Unparseable(String),
}

/// A date in the Ethiopian (Ge'ez) calendar. Months run 1..=13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EthiopianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl EthiopianDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        if !(-MAX_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        let max_day = days_in_ethiopian_month(year, month).ok_or(CalendarError::InvalidMonth {
            calendar: "Ethiopian",
            month,
        })?;
        if day == 0 || day > max_day {
            return Err(CalendarError::InvalidDay {
                calendar: "Ethiopian",
                year,
                month,
                day,
            });
        }
        Ok(Self { year, month, day })
    }

    pub fn to_jdn(self) -> i64 {
        let year = i64::from(self.year);
        ETHIOPIAN_EPOCH_JDN
            + 365 * (year - 1)
            + year.div_euclid(4)
            + 30 * i64::from(self.month - 1)
            + i64::from(self.day)
            - 1
    }

    pub fn from_jdn(jdn: i64) -> Self {
        let days = jdn - ETHIOPIAN_EPOCH_JDN;
        let cycle = days.div_euclid(1461);
        let rem = days.rem_euclid(1461);
        // Year 3 of every four-year cycle is the leap year.
        let (year_in_cycle, day_of_year) = match rem {
            r if r < 365 => (0, r),
            r if r < 730 => (1, r - 365),
            r if r < 1096 => (2, r - 730),
            r => (3, r - 1096),
        };
        Self {
            year: (4 * cycle + year_in_cycle + 1) as i32,
            month: (day_of_year / 30 + 1) as u32,
            day: (day_of_year % 30 + 1) as u32,
        }
    }

    pub fn to_gregorian(self) -> Result<NaiveDate, CalendarError> {
        let days = (self.to_jdn() - GREGORIAN_CE_OFFSET) as i32;
        let date = NaiveDate::from_num_days_from_ce_opt(days)
            .ok_or(CalendarError::YearOutOfRange(self.year))?;
        check_year(date.year())?;
        Ok(date)
    }

    pub fn from_gregorian(date: NaiveDate) -> Result<Self, CalendarError> {
        check_year(date.year())?;
        let jdn = i64::from(date.num_days_from_ce()) + GREGORIAN_CE_OFFSET;
        Ok(Self::from_jdn(jdn))
    }

    /// Empty for a month outside 1..=13; the fields are public, so a
    /// hand-built value is not guaranteed valid.
    pub fn month_name_en(self) -> &'static str {
        month_name(&ETHIOPIAN_MONTHS_EN, self.month)
    }

    pub fn month_name_am(self) -> &'static str {
        month_name(&ETHIOPIAN_MONTHS_AM, self.month)
    }
}

fn month_name(names: &[&'static str], month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| names.get(index as usize))
        .copied()
        .unwrap_or("")
}

fn check_year(year: i32) -> Result<(), CalendarError> {
    if (-MAX_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(CalendarError::YearOutOfRange(year))
    }
}

pub fn is_ethiopian_leap_year(year: i32) -> bool {
    (i64::from(year) + 1).rem_euclid(4) == 0
}

pub fn days_in_ethiopian_month(year: i32, month: u32) -> Option<u32> {
    match month {
        1..=12 => Some(30),
        13 if is_ethiopian_leap_year(year) => Some(6),
        13 => Some(5),
        _ => None,
    }
}

/// Ethiopian (year, month, day) to Gregorian (year, month, day).
pub fn to_gregorian(year: i32, month: u32, day: u32) -> Result<(i32, u32, u32), CalendarError> {
    let date = EthiopianDate::new(year, month, day)?.to_gregorian()?;
    Ok((date.year(), date.month(), date.day()))
}

/// Gregorian (year, month, day) to Ethiopian (year, month, day).
pub fn to_ethiopian(year: i32, month: u32, day: u32) -> Result<(i32, u32, u32), CalendarError> {
    let date = gregorian_date(year, month, day)?;
    let ec = EthiopianDate::from_gregorian(date)?;
    Ok((ec.year, ec.month, ec.day))
}

fn gregorian_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    check_year(year)?;
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth {
            calendar: "Gregorian",
            month,
        });
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarError::InvalidDay {
        calendar: "Gregorian",
        year,
        month,
        day,
    })
}

/// Which calendar a raw date value was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrigin {
    /// Dates typed by registrars.
    Ethiopian,
    /// Dates stamped by the system, e.g. the issue date.
    Gregorian,
}

/// One calendar day expressed in both calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualDate {
    pub ec: EthiopianDate,
    pub gc: NaiveDate,
}

impl DualDate {
    pub fn from_ethiopian(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        let ec = EthiopianDate::new(year, month, day)?;
        Ok(Self {
            ec,
            gc: ec.to_gregorian()?,
        })
    }

    pub fn from_gregorian(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        let gc = gregorian_date(year, month, day)?;
        Ok(Self {
            ec: EthiopianDate::from_gregorian(gc)?,
            gc,
        })
    }

    pub fn from_naive(gc: NaiveDate) -> Result<Self, CalendarError> {
        Ok(Self {
            ec: EthiopianDate::from_gregorian(gc)?,
            gc,
        })
    }

    /// `12/04/2014`
    pub fn ec_numeric(&self) -> String {
        format!("{:02}/{:02}/{}", self.ec.day, self.ec.month, self.ec.year)
    }

    /// `21/12/2021`
    pub fn gc_numeric(&self) -> String {
        self.gc.format("%d/%m/%Y").to_string()
    }

    /// `Tahsas 12, 2014 E.C.`
    pub fn ec_long_en(&self) -> String {
        format!("{} {}, {} E.C.", self.ec.month_name_en(), self.ec.day, self.ec.year)
    }

    /// `ታኅሣሥ 12 ቀን 2014 ዓ.ም.`
    pub fn ec_long_am(&self) -> String {
        format!("{} {} ቀን {} ዓ.ም.", self.ec.month_name_am(), self.ec.day, self.ec.year)
    }

    /// `December 21, 2021`
    pub fn gc_long_en(&self) -> String {
        format!(
            "{} {}, {}",
            GREGORIAN_MONTHS_EN[self.gc.month0() as usize],
            self.gc.day(),
            self.gc.year()
        )
    }

    pub fn gc_long_am(&self) -> String {
        format!(
            "{} {} ቀን {} እ.ኤ.አ.",
            GREGORIAN_MONTHS_AM[self.gc.month0() as usize],
            self.gc.day(),
            self.gc.year()
        )
    }
}

/// A raw date read both ways. Callers pick the side that matches the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateInterpretations {
    pub as_ethiopian: Option<DualDate>,
    pub as_gregorian: Option<DualDate>,
}

impl DateInterpretations {
    pub fn of(raw: RawDate) -> Self {
        Self {
            as_ethiopian: DualDate::from_ethiopian(raw.year, raw.month, raw.day).ok(),
            as_gregorian: DualDate::from_gregorian(raw.year, raw.month, raw.day).ok(),
        }
    }

    pub fn select(self, origin: DateOrigin) -> Option<DualDate> {
        match origin {
            DateOrigin::Ethiopian => self.as_ethiopian,
            DateOrigin::Gregorian => self.as_gregorian,
        }
    }
}
