use crate::error::SyncError;
use chrono::NaiveDate;
use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    pub static ref TIME_OF_DAY: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Raw body of the bookings endpoint, before it is checked against the active variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates_times: Option<HashMap<String, Option<Vec<String>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
}

/// Which of the two payload contracts a controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// `dates_times` payload, only fetched dates are selectable and carry time slots.
    Enable,
    /// `dates` payload, fetched dates are blocked.
    Disable,
}

/// Accepts only the canonical `YYYY-MM-DD` form, so two distinct strings never name the same day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SyncError> {
    match NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
        Ok(date) if date.format(ISO_DATE_FORMAT).to_string() == raw => Ok(date),
        _ => Err(SyncError::InvalidDate(raw.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityMap(BTreeMap<NaiveDate, Vec<String>>);

impl AvailabilityMap {
    pub fn from_payload(payload: AvailabilityPayload) -> Result<Self, SyncError> {
        let dates_times = match (payload.dates_times, payload.dates) {
            (Some(dates_times), _) => dates_times,
            (None, Some(_)) => {
                return Err(SyncError::UnexpectedShape(
                    "got a `dates` list, expected a `dates_times` object".into(),
                ))
            }
            (None, None) => {
                return Err(SyncError::UnexpectedShape(
                    "missing `dates_times` object".into(),
                ))
            }
        };

        let mut available = BTreeMap::new();
        for (raw_date, times) in dates_times {
            let date = parse_date(&raw_date)?;
            let times = times.unwrap_or_default();
            if let Some(time) = times.iter().find(|time| !TIME_OF_DAY.is_match(time)) {
                return Err(SyncError::InvalidTime {
                    date: raw_date,
                    time: time.clone(),
                });
            }
            if available.insert(date, times).is_some() {
                return Err(SyncError::UnexpectedShape(format!(
                    "`dates_times` lists {date} more than once"
                )));
            }
        }
        Ok(Self(available))
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.0.keys().copied().collect()
    }

    /// Slots for `date` in the order the backend sent them. Unknown dates have none.
    pub fn times(&self, date: NaiveDate) -> &[String] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_slot(&self, date: NaiveDate, time: &str) -> bool {
        self.times(date).iter().any(|slot| slot == time)
    }
}

impl<const N: usize> From<[(NaiveDate, Vec<String>); N]> for AvailabilityMap {
    fn from(entries: [(NaiveDate, Vec<String>); N]) -> Self {
        Self(BTreeMap::from(entries))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisabledDateList(Vec<NaiveDate>);

impl DisabledDateList {
    pub fn from_payload(payload: AvailabilityPayload) -> Result<Self, SyncError> {
        let dates = match (payload.dates, payload.dates_times) {
            (Some(dates), _) => dates,
            (None, Some(_)) => {
                return Err(SyncError::UnexpectedShape(
                    "got a `dates_times` object, expected a `dates` list".into(),
                ))
            }
            (None, None) => return Err(SyncError::UnexpectedShape("missing `dates` list".into())),
        };

        let disabled = dates
            .iter()
            .map(|raw| parse_date(raw))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self(disabled.into_iter().collect()))
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }
}

/// One normalized fetch result. Always replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Slots(AvailabilityMap),
    Blocked(DisabledDateList),
}

impl Snapshot {
    pub fn normalize(payload: AvailabilityPayload, variant: Variant) -> Result<Self, SyncError> {
        match variant {
            Variant::Enable => AvailabilityMap::from_payload(payload).map(Snapshot::Slots),
            Variant::Disable => DisabledDateList::from_payload(payload).map(Snapshot::Blocked),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    fn payload(json: &str) -> AvailabilityPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_dates_times() {
        let snapshot = Snapshot::normalize(
            payload(r#"{"dates_times":{"2025-12-18":["09:00","12:00"],"2025-12-19":[]}}"#),
            Variant::Enable,
        )
        .unwrap();

        let Snapshot::Slots(available) = snapshot else {
            panic!("expected a slots snapshot");
        };
        assert_eq!(available.dates(), vec![date("2025-12-18"), date("2025-12-19")]);
        assert_eq!(available.times(date("2025-12-18")), ["09:00", "12:00"]);
        assert!(available.times(date("2025-12-19")).is_empty());
        assert!(available.times(date("2025-12-20")).is_empty());
        assert!(available.contains_slot(date("2025-12-18"), "12:00"));
        assert!(!available.contains_slot(date("2025-12-18"), "10:00"));
    }

    #[test]
    fn test_times_keep_backend_order() {
        let available = AvailabilityMap::from_payload(payload(
            r#"{"dates_times":{"2025-12-18":["15:30","09:00","12:00"]}}"#,
        ))
        .unwrap();
        assert_eq!(available.times(date("2025-12-18")), ["15:30", "09:00", "12:00"]);
    }

    #[test]
    fn test_null_time_list_is_empty() {
        let available =
            AvailabilityMap::from_payload(payload(r#"{"dates_times":{"2025-12-18":null}}"#))
                .unwrap();
        assert_eq!(available.dates(), vec![date("2025-12-18")]);
        assert!(available.times(date("2025-12-18")).is_empty());
    }

    #[test]
    fn test_normalize_disabled_dates() {
        let snapshot = Snapshot::normalize(
            payload(r#"{"dates":["2025-12-21","2025-12-20","2025-12-21"]}"#),
            Variant::Disable,
        )
        .unwrap();
        assert_eq!(
            snapshot,
            Snapshot::Blocked(DisabledDateList(vec![date("2025-12-20"), date("2025-12-21")]))
        );
    }

    #[test_case::test_case(r#"{"dates":["2025-12-20"]}"#, Variant::Enable ; "dates list for enable variant")]
    #[test_case::test_case(r#"{"dates_times":{}}"#, Variant::Disable ; "dates_times for disable variant")]
    #[test_case::test_case(r#"{}"#, Variant::Enable ; "empty object for enable variant")]
    #[test_case::test_case(r#"{}"#, Variant::Disable ; "empty object for disable variant")]
    fn test_unexpected_shape(json: &str, variant: Variant) {
        let err = Snapshot::normalize(payload(json), variant).unwrap_err();
        assert!(matches!(err, SyncError::UnexpectedShape(_)), "{err:?}");
    }

    #[test_case::test_case(r#"{"dates_times":{"18.12.2025":["09:00"]}}"#, Variant::Enable)]
    #[test_case::test_case(r#"{"dates_times":{"2025-02-30":[]}}"#, Variant::Enable)]
    #[test_case::test_case(r#"{"dates":["2025-12-20","tomorrow"]}"#, Variant::Disable)]
    #[test_case::test_case(r#"{"dates_times":{"2025-1-5":["09:00"]}}"#, Variant::Enable ; "unpadded month and day")]
    #[test_case::test_case(r#"{"dates_times":{" 2025-12-18 ":[]}}"#, Variant::Enable ; "surrounding whitespace")]
    #[test_case::test_case(r#"{"dates":["+2025-12-18"]}"#, Variant::Disable ; "signed year")]
    fn test_invalid_date_rejects_payload(json: &str, variant: Variant) {
        let err = Snapshot::normalize(payload(json), variant).unwrap_err();
        assert!(matches!(err, SyncError::InvalidDate(_)), "{err:?}");
    }

    #[test_case::test_case("2025-1-5" ; "unpadded month and day")]
    #[test_case::test_case("2025-01-5" ; "unpadded day")]
    #[test_case::test_case(" 2025-01-05" ; "leading whitespace")]
    #[test_case::test_case("+2025-01-05" ; "signed year")]
    fn test_parse_date_accepts_only_canonical_form(raw: &str) {
        assert_eq!(parse_date("2025-01-05").unwrap(), NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert!(matches!(parse_date(raw), Err(SyncError::InvalidDate(_))));
    }

    #[test]
    fn test_aliased_dates_do_not_overwrite_each_other() {
        let err = AvailabilityMap::from_payload(payload(
            r#"{"dates_times":{"2025-1-5":["09:00"],"2025-01-05":[]}}"#,
        ))
        .unwrap_err();
        assert!(
            matches!(err, SyncError::InvalidDate(ref raw) if raw == "2025-1-5"),
            "{err:?}"
        );
    }

    #[test_case::test_case("9:00")]
    #[test_case::test_case("24:00")]
    #[test_case::test_case("12:60")]
    #[test_case::test_case("noon")]
    fn test_invalid_time_rejects_payload(time: &str) {
        let json = format!(r#"{{"dates_times":{{"2025-12-18":["09:00","{time}"]}}}}"#);
        let err = AvailabilityMap::from_payload(payload(&json)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidTime { .. }), "{err:?}");
    }
}
