use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::AttendanceError;

/// Attendance status recorded for one employee on one calendar date.
///
/// The wire/database spelling is the human label (`"Sick Leave"`), parsing is
/// case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumString,
    AsRefStr,
    EnumIter,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum DayStatus {
    #[serde(rename = "Present")]
    #[strum(serialize = "Present")]
    Present,
    #[serde(rename = "Holiday")]
    #[strum(serialize = "Holiday")]
    Holiday,
    #[serde(rename = "Absent")]
    #[strum(serialize = "Absent")]
    Absent,
    #[serde(rename = "Sick Leave")]
    #[strum(serialize = "Sick Leave")]
    SickLeave,
    #[serde(rename = "Paid Leave")]
    #[strum(serialize = "Paid Leave")]
    PaidLeave,
    #[serde(rename = "Unpaid Leave")]
    #[strum(serialize = "Unpaid Leave")]
    UnpaidLeave,
    #[serde(rename = "Leave Without Inform")]
    #[strum(serialize = "Leave Without Inform")]
    LeaveWithoutInform,
    #[serde(rename = "Work From Home")]
    #[strum(serialize = "Work From Home")]
    WorkFromHome,
    #[serde(rename = "Half Day")]
    #[strum(serialize = "Half Day")]
    HalfDay,
    #[serde(rename = "New Induction")]
    #[strum(serialize = "New Induction")]
    NewInduction,
}

impl DayStatus {
    /// Short code printed in spreadsheet exports.
    pub fn short_code(&self) -> &'static str {
        match self {
            DayStatus::Present => "P",
            DayStatus::Holiday => "H",
            DayStatus::Absent => "A",
            DayStatus::SickLeave => "SL",
            DayStatus::PaidLeave => "PL",
            DayStatus::UnpaidLeave => "UL",
            DayStatus::LeaveWithoutInform => "LWI",
            DayStatus::WorkFromHome => "WFH",
            DayStatus::HalfDay => "HD",
            DayStatus::NewInduction => "NI",
        }
    }

    pub fn is_leave(&self) -> bool {
        matches!(
            self,
            DayStatus::PaidLeave | DayStatus::UnpaidLeave | DayStatus::SickLeave
        )
    }

    pub fn parse(raw: &str) -> Result<Self, AttendanceError> {
        DayStatus::from_str(raw.trim()).map_err(|_| AttendanceError::UnknownStatus(raw.to_string()))
    }
}

/// A calendar month, ordered chronologically. Renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{:04}-{:02}", year, month)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, AttendanceError> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(AttendanceError::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // year/month validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .with_day(self.days_in_month())
            .unwrap_or_else(|| self.first_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Every calendar date of the month, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        first.iter_days().take(self.days_in_month() as usize)
    }
}

impl FromStr for YearMonth {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AttendanceError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = AttendanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AttendanceError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::InvalidDate(raw.to_string()))
}

/// Strict `YYYY-MM-DD` for request payloads, reported as [`AttendanceError::InvalidDate`].
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Punch times travel as `HH:MM` (seconds accepted on input).
pub mod punch_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::AttendanceError;

    pub fn parse(raw: &str) -> Result<NaiveTime, AttendanceError> {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map_err(|_| AttendanceError::InvalidTime(raw.to_string()))
    }

    /// Empty strings mean "no punch", the edit form sends them for cleared inputs.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<NaiveTime>, AttendanceError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse(value).map(Some),
        }
    }

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        parse_optional(raw.as_deref()).map_err(serde::de::Error::custom)
    }
}

/// Which of the two punches a day carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchState {
    Missing,
    Partial,
    Complete,
}

/// One employee's attendance on one calendar date.
///
/// `late_excused` / `early_excused` are the per-violation excusal flags; when
/// absent (`None`) the legacy `excused` flag applies. JSON `null` and a
/// missing key both decode to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDay {
    #[schema(value_type = String, format = "date", example = "2026-01-05")]
    pub date: NaiveDate,

    pub status: DayStatus,

    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "09:10")]
    pub check_in: Option<NaiveTime>,

    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "18:00")]
    pub check_out: Option<NaiveTime>,

    #[serde(default)]
    pub late: bool,

    #[serde(default)]
    pub early_leave: bool,

    /// Legacy single excusal flag.
    #[serde(default)]
    pub excused: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_excused: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_excused: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
}

impl AttendanceDay {
    /// A day with the given status and nothing else recorded.
    pub fn new(date: NaiveDate, status: DayStatus) -> Self {
        Self {
            date,
            status,
            check_in: None,
            check_out: None,
            late: false,
            early_leave: false,
            excused: false,
            late_excused: None,
            early_excused: None,
            reason: None,
            shift: None,
        }
    }

    pub fn with_punches(mut self, check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Self {
        self.check_in = check_in;
        self.check_out = check_out;
        self
    }

    pub fn punch_state(&self) -> PunchState {
        match (self.check_in.is_some(), self.check_out.is_some()) {
            (false, false) => PunchState::Missing,
            (true, true) => PunchState::Complete,
            _ => PunchState::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn status_labels_round_trip_through_from_str() {
        for status in DayStatus::iter() {
            assert_eq!(DayStatus::parse(status.as_ref()), Ok(status));
        }
        assert_eq!(DayStatus::parse("sick leave"), Ok(DayStatus::SickLeave));
        assert!(matches!(
            DayStatus::parse("Vacation"),
            Err(AttendanceError::UnknownStatus(_))
        ));
    }

    #[test]
    fn only_the_three_leave_statuses_are_leave() {
        let leave: Vec<DayStatus> = DayStatus::iter().filter(DayStatus::is_leave).collect();
        assert_eq!(
            leave,
            vec![DayStatus::SickLeave, DayStatus::PaidLeave, DayStatus::UnpaidLeave]
        );
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&DayStatus::LeaveWithoutInform).unwrap();
        assert_eq!(json, "\"Leave Without Inform\"");
        assert_eq!(DayStatus::WorkFromHome.short_code(), "WFH");
    }

    #[test]
    fn year_month_parses_and_orders() {
        let jan: YearMonth = "2026-01".parse().unwrap();
        let dec: YearMonth = "2025-12".parse().unwrap();
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2026-01");
        assert!("2026-1".parse::<YearMonth>().is_err());
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("january".parse::<YearMonth>().is_err());
    }

    #[test]
    fn year_month_knows_its_length() {
        let feb_leap: YearMonth = "2024-02".parse().unwrap();
        let feb: YearMonth = "2026-02".parse().unwrap();
        let dec: YearMonth = "2026-12".parse().unwrap();
        assert_eq!(feb_leap.days_in_month(), 29);
        assert_eq!(feb.days_in_month(), 28);
        assert_eq!(dec.days_in_month(), 31);
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(feb.dates().count(), 28);
    }

    #[test]
    fn day_decodes_camel_case_with_optional_fields() {
        let day: AttendanceDay = serde_json::from_value(serde_json::json!({
            "date": "2026-01-05",
            "status": "Present",
            "checkIn": null,
            "checkOut": "18:00",
            "earlyLeave": true,
            "excused": true
        }))
        .unwrap();

        assert_eq!(day.check_in, None);
        assert_eq!(day.check_out, NaiveTime::from_hms_opt(18, 0, 0));
        assert!(day.early_leave);
        assert_eq!(day.late_excused, None);
        assert_eq!(day.punch_state(), PunchState::Partial);
    }

    #[test]
    fn punch_time_accepts_seconds_and_blank() {
        assert_eq!(
            punch_time::parse("09:10:30").unwrap(),
            NaiveTime::from_hms_opt(9, 10, 30).unwrap()
        );
        assert_eq!(punch_time::parse_optional(Some("  ")), Ok(None));
        assert!(punch_time::parse("9am").is_err());
    }
}
