use crate::attendance::classifier::{DayClass, LeaveKind};
use crate::model::attendance::{AttendanceDay, DayStatus};

/// Payroll policy applied by the monthly aggregator.
///
/// How much a violation costs and how a day of salary is priced are
/// organisation decisions, so they live behind this trait instead of in the
/// aggregation itself.
pub trait DeductionPolicy {
    /// Fraction of a salary day deducted for `day`, already classified as `class`.
    fn deduction_weight(&self, day: &AttendanceDay, class: DayClass) -> f64;

    /// Salary value of one day.
    fn per_day_rate(&self, monthly_salary: f64, days_in_month: u32) -> f64;
}

/// Divisor used to price one salary day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateBasis {
    /// Calendar days of the month being paid.
    CalendarDays,
    /// A fixed number of days regardless of month length (e.g. 26 or 30).
    FixedDays(f64),
}

impl std::str::FromStr for RateBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" | "calendar_days" => Ok(RateBasis::CalendarDays),
            other => match other.parse::<f64>() {
                Ok(days) if days > 0.0 => Ok(RateBasis::FixedDays(days)),
                _ => Err(format!(
                    "expected `calendar` or a positive number of days, got `{s}`"
                )),
            },
        }
    }
}

/// Day-weights per violation kind, loaded from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRules {
    pub late: f64,
    pub early: f64,
    pub late_and_early: f64,
    pub partial_punch: f64,
    pub absent: f64,
    pub leave_without_inform: f64,
    pub unpaid_leave: f64,
    /// Added on top of any punch violation for `Half Day` status.
    pub half_day: f64,
    pub rate_basis: RateBasis,
}

impl Default for ViolationRules {
    fn default() -> Self {
        Self {
            late: 0.25,
            early: 0.25,
            late_and_early: 0.5,
            partial_punch: 0.5,
            absent: 1.0,
            leave_without_inform: 1.0,
            unpaid_leave: 1.0,
            half_day: 0.5,
            rate_basis: RateBasis::CalendarDays,
        }
    }
}

impl DeductionPolicy for ViolationRules {
    fn deduction_weight(&self, day: &AttendanceDay, class: DayClass) -> f64 {
        let violation = match class {
            DayClass::LateOnly => self.late,
            DayClass::EarlyOnly => self.early,
            DayClass::LateAndEarly => self.late_and_early,
            DayClass::PartialPunch => self.partial_punch,
            DayClass::Absent => self.absent,
            DayClass::LeaveWithoutInform => self.leave_without_inform,
            DayClass::Leave(LeaveKind::Unpaid) => self.unpaid_leave,
            DayClass::Upcoming => return 0.0,
            _ => 0.0,
        };

        if day.status == DayStatus::HalfDay {
            violation + self.half_day
        } else {
            violation
        }
    }

    fn per_day_rate(&self, monthly_salary: f64, days_in_month: u32) -> f64 {
        let divisor = match self.rate_basis {
            RateBasis::CalendarDays => f64::from(days_in_month),
            RateBasis::FixedDays(days) => days,
        };
        if divisor <= 0.0 {
            return 0.0;
        }
        monthly_salary / divisor
    }
}
