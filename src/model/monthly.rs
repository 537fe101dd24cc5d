use serde::Serialize;
use utoipa::ToSchema;

use crate::attendance::classifier::{DayClass, Tone};
use crate::model::attendance::{AttendanceDay, YearMonth};

/// A day together with how it was read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDay {
    #[serde(flatten)]
    pub day: AttendanceDay,

    #[schema(value_type = String, example = "late")]
    pub classification: DayClass,

    pub tone: Tone,

    pub upcoming: bool,

    #[schema(value_type = String, example = "P")]
    pub status_short_code: &'static str,
}

impl ClassifiedDay {
    pub fn new(day: AttendanceDay, classification: DayClass) -> Self {
        Self {
            status_short_code: day.status.short_code(),
            tone: classification.tone(),
            upcoming: classification == DayClass::Upcoming,
            classification,
            day,
        }
    }
}

/// One employee's month, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEmployeeRecord {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    pub name: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub shift: Option<String>,
    pub monthly_salary: f64,
    pub late_count: u32,
    pub early_count: u32,
    pub salary_deduct_days: f64,
    pub salary_deduct_amount: f64,
    pub net_salary: f64,
    pub days: Vec<ClassifiedDay>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    #[schema(value_type = String, example = "2026-03")]
    pub month: YearMonth,
    pub days_in_month: u32,
    pub employees: Vec<MonthlyEmployeeRecord>,
}
