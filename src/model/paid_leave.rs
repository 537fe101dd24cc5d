use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;
use crate::model::attendance::{AttendanceDay, DayStatus};

/// Calendar quarter of a year, Q1 = January..March.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1 = 1,
    Q2 = 2,
    Q3 = 3,
    Q4 = 4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize - 1
    }
}

impl TryFrom<u8> for Quarter {
    type Error = AttendanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quarter::Q1),
            2 => Ok(Quarter::Q2),
            3 => Ok(Quarter::Q3),
            4 => Ok(Quarter::Q4),
            other => Err(AttendanceError::InvalidQuarter(other)),
        }
    }
}

/// Paid leave usage within one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuarterBalance {
    pub taken: u32,
    pub allocated: u32,
    pub remaining: u32,
    #[schema(value_type = Vec<String>, example = json!(["2026-02-10"]))]
    pub dates: Vec<NaiveDate>,
}

impl QuarterBalance {
    /// `taken` always equals the number of distinct dates; `remaining` never goes below zero.
    pub fn new(allocated: u32, mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        let taken = dates.len() as u32;
        Self {
            taken,
            allocated,
            remaining: allocated.saturating_sub(taken),
            dates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaidLeaveQuarterRecord {
    pub emp_code: String,
    pub year: i32,
    pub q1: QuarterBalance,
    pub q2: QuarterBalance,
    pub q3: QuarterBalance,
    pub q4: QuarterBalance,
}

impl PaidLeaveQuarterRecord {
    /// Buckets the `PaidLeave` days of `year` by quarter. Days of other years
    /// and other statuses are ignored.
    pub fn build(emp_code: &str, year: i32, allocations: [u32; 4], days: &[AttendanceDay]) -> Self {
        let mut buckets: [Vec<NaiveDate>; 4] = Default::default();

        for day in days
            .iter()
            .filter(|d| d.status == DayStatus::PaidLeave && d.date.year() == year)
        {
            buckets[Quarter::of(day.date).index()].push(day.date);
        }

        let [q1, q2, q3, q4] = buckets;
        Self {
            emp_code: emp_code.to_string(),
            year,
            q1: QuarterBalance::new(allocations[0], q1),
            q2: QuarterBalance::new(allocations[1], q2),
            q3: QuarterBalance::new(allocations[2], q3),
            q4: QuarterBalance::new(allocations[3], q4),
        }
    }

    pub fn quarter(&self, quarter: Quarter) -> &QuarterBalance {
        match quarter {
            Quarter::Q1 => &self.q1,
            Quarter::Q2 => &self.q2,
            Quarter::Q3 => &self.q3,
            Quarter::Q4 => &self.q4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn remaining_never_negative() {
        let balance = QuarterBalance::new(1, vec![date("2026-01-02"), date("2026-01-03")]);
        assert_eq!(balance.taken, 2);
        assert_eq!(balance.remaining, 0);
        assert_eq!(balance.dates.len() as u32, balance.taken);
    }

    #[test]
    fn duplicate_dates_count_once() {
        let balance = QuarterBalance::new(3, vec![date("2026-05-02"), date("2026-05-02")]);
        assert_eq!(balance.taken, 1);
        assert_eq!(balance.remaining, 2);
    }

    #[test]
    fn build_buckets_paid_leave_by_quarter() {
        let days = vec![
            AttendanceDay::new(date("2026-03-31"), DayStatus::PaidLeave),
            AttendanceDay::new(date("2026-04-01"), DayStatus::PaidLeave),
            AttendanceDay::new(date("2026-04-02"), DayStatus::SickLeave),
            AttendanceDay::new(date("2026-11-20"), DayStatus::PaidLeave),
            AttendanceDay::new(date("2025-12-30"), DayStatus::PaidLeave),
        ];

        let record = PaidLeaveQuarterRecord::build("EMP-1", 2026, [2, 2, 2, 2], &days);

        assert_eq!(record.q1.dates, vec![date("2026-03-31")]);
        assert_eq!(record.q2.taken, 1);
        assert_eq!(record.q3.taken, 0);
        assert_eq!(record.q3.remaining, 2);
        assert_eq!(record.quarter(Quarter::Q4).dates, vec![date("2026-11-20")]);
    }

    #[test]
    fn quarter_from_number() {
        assert_eq!(Quarter::try_from(3), Ok(Quarter::Q3));
        assert_eq!(Quarter::try_from(5), Err(AttendanceError::InvalidQuarter(5)));
    }
}
