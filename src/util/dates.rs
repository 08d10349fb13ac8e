use std::sync::LazyLock;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Zone-less layouts accepted for due dates, interpreted in local time.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

static RELATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d+)([mhd])$").expect("valid regex"));

/// Parse a stored due-date string. Accepts RFC 3339 and the zone-less
/// `datetime-local` shapes. Empty strings mean "no due date".
pub fn parse_stored(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(local_to_utc)
}

/// Parse a due date typed on the command line.
///
/// On top of [`parse_stored`], accepts a bare `YYYY-MM-DD` (local midnight)
/// and relative offsets like `+30m`, `+2h`, `+1d`.
pub fn parse_due(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Some(caps) = RELATIVE_RE.captures(input) {
        let n: i64 = caps[1]
            .parse()
            .map_err(|_| format!("offset too large: {}", input))?;
        let offset = match &caps[2] {
            "m" => Duration::try_minutes(n),
            "h" => Duration::try_hours(n),
            _ => Duration::try_days(n),
        }
        .ok_or_else(|| format!("offset too large: {}", input))?;
        return now
            .checked_add_signed(offset)
            .ok_or_else(|| format!("offset too large: {}", input));
    }
    if let Some(dt) = parse_stored(input) {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0).and_then(local_to_utc)
    {
        return Ok(dt);
    }
    Err(format!(
        "invalid due date '{}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM, RFC 3339, or +<n>m|h|d)",
        input
    ))
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a timestamp in local time for human output.
pub fn format_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// `Option<String>` field where `""` (as written by older iterations) means absent.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Serde adapter for optional due dates in the stored layout.
pub mod due_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_stored(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {}", s))),
        }
    }

    /// Patch form: missing key leaves the field alone (`None`), `null` or `""`
    /// clears it (`Some(None)`).
    pub fn deserialize_patch<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}
