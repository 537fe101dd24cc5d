use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::attendance::YearMonth;

/// Decides whether a day is still open for attendance purposes.
///
/// Days after today, and every day of a month after the current one, are
/// upcoming. Today stays upcoming until the daily cutoff (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingGate {
    cutoff: NaiveTime,
}

impl Default for UpcomingGate {
    fn default() -> Self {
        Self {
            cutoff: Self::default_cutoff(),
        }
    }
}

impl UpcomingGate {
    /// 08:55 local time.
    pub fn default_cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 55, 0).unwrap_or_default()
    }

    pub fn new(cutoff: NaiveTime) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    /// `now` is the organisation's local wall-clock time.
    pub fn is_upcoming(&self, date: NaiveDate, month: YearMonth, now: NaiveDateTime) -> bool {
        let today = now.date();
        let current_month = YearMonth::of(today);

        if month > current_month {
            return true;
        }
        if month < current_month {
            return false;
        }
        if date != today {
            return date > today;
        }

        now.time() < self.cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn d(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn whole_future_month_is_upcoming() {
        let gate = UpcomingGate::default();
        let now = at("2026-03-15", 12, 0);
        let april: YearMonth = "2026-04".parse().unwrap();

        assert!(april.dates().all(|date| gate.is_upcoming(date, april, now)));
    }

    #[test]
    fn whole_past_month_is_closed() {
        let gate = UpcomingGate::default();
        let now = at("2026-03-01", 0, 0);
        let feb: YearMonth = "2026-02".parse().unwrap();

        assert!(feb.dates().all(|date| !gate.is_upcoming(date, feb, now)));
    }

    #[test]
    fn current_month_splits_on_today() {
        let gate = UpcomingGate::default();
        let now = at("2026-03-15", 12, 0);
        let march: YearMonth = "2026-03".parse().unwrap();

        assert!(!gate.is_upcoming(d("2026-03-14"), march, now));
        assert!(gate.is_upcoming(d("2026-03-16"), march, now));
        assert!(!gate.is_upcoming(d("2026-03-15"), march, now));
    }

    #[test]
    fn today_is_upcoming_strictly_before_cutoff() {
        let gate = UpcomingGate::default();
        let march: YearMonth = "2026-03".parse().unwrap();
        let today = d("2026-03-15");

        assert!(gate.is_upcoming(today, march, at("2026-03-15", 8, 54)));
        assert!(!gate.is_upcoming(today, march, at("2026-03-15", 8, 55)));
        assert!(gate.is_upcoming(today, march, at("2026-03-15", 0, 0)));
    }

    #[test]
    fn custom_cutoff_is_honoured() {
        let gate = UpcomingGate::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        let march: YearMonth = "2026-03".parse().unwrap();

        assert!(gate.is_upcoming(d("2026-03-15"), march, at("2026-03-15", 9, 30)));
        assert_eq!(gate.cutoff(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }
}
