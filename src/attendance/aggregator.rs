use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::attendance::classifier::{DayClass, classify_at};
use crate::attendance::gate::UpcomingGate;
use crate::attendance::policy::DeductionPolicy;
use crate::model::attendance::{AttendanceDay, DayStatus, YearMonth};
use crate::model::employee::Employee;
use crate::model::monthly::{ClassifiedDay, MonthlyEmployeeRecord};

/// Folds an employee's days into monthly totals.
///
/// Holds no state between calls; one instance can serve every request.
#[derive(Debug, Clone)]
pub struct MonthlyAggregator<P> {
    gate: UpcomingGate,
    policy: P,
}

impl<P: DeductionPolicy> MonthlyAggregator<P> {
    pub fn new(gate: UpcomingGate, policy: P) -> Self {
        Self { gate, policy }
    }

    /// `days` must already be the month's sequence (see [`complete_month`]).
    /// Upcoming days are carried through for display but never counted.
    pub fn aggregate(
        &self,
        employee: &Employee,
        month: YearMonth,
        days: Vec<AttendanceDay>,
        now: NaiveDateTime,
    ) -> MonthlyEmployeeRecord {
        let days_in_month = month.days_in_month();
        let mut late_count = 0u32;
        let mut early_count = 0u32;
        let mut deduct_days = 0.0f64;

        let classified: Vec<ClassifiedDay> = days
            .into_iter()
            .map(|day| {
                let class = classify_at(&day, month, now, &self.gate);
                if class == DayClass::Upcoming {
                    return ClassifiedDay::new(day, class);
                }

                if class.has_late_violation() {
                    late_count += 1;
                }
                if class.has_early_violation() {
                    early_count += 1;
                }
                deduct_days += self.policy.deduction_weight(&day, class);

                ClassifiedDay::new(day, class)
            })
            .collect();

        let salary_deduct_days = round2(deduct_days);
        let rate = self
            .policy
            .per_day_rate(employee.monthly_salary, days_in_month);
        let salary_deduct_amount = round2(salary_deduct_days * rate);
        let net_salary = round2((employee.monthly_salary - salary_deduct_amount).max(0.0));

        debug!(
            emp_code = %employee.emp_code,
            %month,
            late_count,
            early_count,
            salary_deduct_days,
            "Aggregated monthly attendance"
        );

        MonthlyEmployeeRecord {
            emp_code: employee.emp_code.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            designation: employee.designation.clone(),
            shift: employee.shift.clone(),
            monthly_salary: employee.monthly_salary,
            late_count,
            early_count,
            salary_deduct_days,
            salary_deduct_amount,
            net_salary,
            days: classified,
        }
    }
}

/// Reason attached to days synthesised for dates with no stored record.
pub const MISSING_RECORD_REASON: &str = "No attendance record";

/// Produces one record per calendar day of `month`, ascending.
///
/// Records outside the month are dropped, a later duplicate for the same date
/// replaces an earlier one, and dates with no record become `Absent` days
/// with no punches and [`MISSING_RECORD_REASON`] as their reason. Weekends and
/// holidays therefore have to be stored to avoid an absence deduction.
pub fn complete_month(month: YearMonth, days: Vec<AttendanceDay>) -> Vec<AttendanceDay> {
    let mut by_date: BTreeMap<NaiveDate, AttendanceDay> = days
        .into_iter()
        .filter(|day| month.contains(day.date))
        .map(|day| (day.date, day))
        .collect();

    month
        .dates()
        .map(|date| {
            by_date
                .remove(&date)
                .unwrap_or_else(|| AttendanceDay {
                    reason: Some(MISSING_RECORD_REASON.to_string()),
                    ..AttendanceDay::new(date, DayStatus::Absent)
                })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
