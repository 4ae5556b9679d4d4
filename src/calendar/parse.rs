use serde_json::Value;

use super::CalendarError;

/// Calendar-agnostic year/month/day as typed into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Reads `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY`, ISO timestamps and
/// `{year, month, day}` objects. Range checks belong to the calendar.
pub fn parse_date_value(value: &Value) -> Result<RawDate, CalendarError> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Object(map) => {
            let part = |key: &str| -> Option<i64> {
                match map.get(key)? {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                }
            };
            match (part("year"), part("month"), part("day")) {
                (Some(year), Some(month), Some(day)) => raw_from_parts(year, month, day)
                    .ok_or_else(|| CalendarError::Unparseable(value.to_string())),
                _ => Err(CalendarError::Unparseable(value.to_string())),
            }
        }
        other => Err(CalendarError::Unparseable(other.to_string())),
    }
}

pub fn parse_date_str(input: &str) -> Result<RawDate, CalendarError> {
    let unparseable = || CalendarError::Unparseable(input.to_string());
    let trimmed = input.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    let parts: Vec<&str> = date_part.split(['-', '/', '.']).collect();
    let numeric = |p: &&str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if parts.len() != 3 || !parts.iter().all(numeric) {
        return Err(unparseable());
    }

    let nums: Vec<i64> = parts
        .iter()
        .map(|p| p.parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|_| unparseable())?;

    let raw = if parts[0].len() == 4 {
        raw_from_parts(nums[0], nums[1], nums[2])
    } else if parts[2].len() == 4 {
        raw_from_parts(nums[2], nums[1], nums[0])
    } else {
        None
    };
    raw.ok_or_else(unparseable)
}

fn raw_from_parts(year: i64, month: i64, day: i64) -> Option<RawDate> {
    Some(RawDate {
        year: i32::try_from(year).ok()?,
        month: u32::try_from(month).ok()?,
        day: u32::try_from(day).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(year: i32, month: u32, day: u32) -> RawDate {
        RawDate { year, month, day }
    }

    #[test]
    fn accepts_common_layouts() {
        assert_eq!(parse_date_str("2014-04-12").unwrap(), raw(2014, 4, 12));
        assert_eq!(parse_date_str("2014/4/12").unwrap(), raw(2014, 4, 12));
        assert_eq!(parse_date_str("12/04/2014").unwrap(), raw(2014, 4, 12));
        assert_eq!(parse_date_str("2021-12-21T08:30:00Z").unwrap(), raw(2021, 12, 21));
        assert_eq!(parse_date_str(" 2021-12-21 08:30 ").unwrap(), raw(2021, 12, 21));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date_str("").is_err());
        assert!(parse_date_str("yesterday").is_err());
        assert!(parse_date_str("12-04-14").is_err());
        assert!(parse_date_str("2014-04").is_err());
        assert!(parse_date_value(&json!(true)).is_err());
    }

    #[test]
    fn reads_objects_with_numeric_or_string_parts() {
        let value = json!({"year": 2014, "month": "4", "day": 12});
        assert_eq!(parse_date_value(&value).unwrap(), raw(2014, 4, 12));
        assert!(parse_date_value(&json!({"year": 2014})).is_err());
    }
}
