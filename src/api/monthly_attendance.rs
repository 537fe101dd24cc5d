use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::api::internal_error;
use crate::attendance::aggregator::complete_month;
use crate::attendance::{DeductionPolicy, MonthlyAggregator, evaluate_punches};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{AttendanceDay, DayStatus, YearMonth, iso_date, punch_time};
use crate::model::employee::Employee;
use crate::model::monthly::{MonthlyAttendance, MonthlyEmployeeRecord};
use crate::utils::attendance_store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month to report, `YYYY-MM`
    #[schema(example = "2026-03")]
    pub month: String,
}

/// A reviewer's correction of one attendance day.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEdit {
    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[serde(deserialize_with = "iso_date::deserialize")]
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub date: NaiveDate,

    pub status: DayStatus,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "09:10")]
    pub check_in_time: Option<NaiveTime>,

    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "18:00")]
    pub check_out_time: Option<NaiveTime>,

    #[serde(default)]
    pub late_excused: Option<bool>,

    #[serde(default)]
    pub early_excused: Option<bool>,

    /// Legacy single excusal flag
    #[serde(default)]
    pub violation_excused: Option<bool>,
}

/// Classifies and totals one employee's month.
pub(crate) async fn employee_month<P: DeductionPolicy>(
    pool: &MySqlPool,
    aggregator: &MonthlyAggregator<P>,
    employee: &Employee,
    month: YearMonth,
    now: NaiveDateTime,
) -> anyhow::Result<MonthlyEmployeeRecord> {
    let mut days = attendance_store::fetch_days(
        pool,
        month.first_day(),
        month.last_day(),
        Some(&employee.emp_code),
        None,
    )
    .await?;

    let days = days.remove(&employee.emp_code).unwrap_or_default();
    Ok(aggregator.aggregate(employee, month, complete_month(month, days), now))
}

/// Monthly attendance with per-day classification and payroll deductions
///
/// Dates without a stored record are reported as `Absent` with the reason
/// "No attendance record" and are deducted like any absence. Store holidays
/// and weekly off days explicitly.
#[utoipa::path(
    get,
    path = "/api/hr/monthly-attendance",
    params(MonthQuery),
    responses(
        (status = 200, description = "Monthly attendance", body = MonthlyAttendance),
        (status = 400, description = "Invalid month", body = Object, example = json!({
            "message": "invalid month `2026-3`, expected YYYY-MM"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(
    name = "monthly_attendance",
    skip(auth, pool, config, query),
    fields(month = %query.month, user = %auth.username)
)]
pub async fn get_monthly_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let month: YearMonth = query.month.parse()?;

    // Employees only ever see their own month
    let scope = if auth.role.is_hr_or_admin() {
        None
    } else {
        match auth.emp_code.as_deref() {
            Some(code) => Some(code),
            None => return Err(actix_web::error::ErrorForbidden("No employee profile")),
        }
    };

    let employees = attendance_store::fetch_employees(pool.get_ref(), scope)
        .await
        .map_err(internal_error)?;

    let mut days = attendance_store::fetch_days(
        pool.get_ref(),
        month.first_day(),
        month.last_day(),
        scope,
        None,
    )
    .await
    .map_err(internal_error)?;

    let aggregator = MonthlyAggregator::new(config.upcoming_gate(), config.violation_rules.clone());
    let now = config.local_now();

    let records = employees
        .iter()
        .map(|employee| {
            let recorded = days.remove(&employee.emp_code).unwrap_or_default();
            aggregator.aggregate(employee, month, complete_month(month, recorded), now)
        })
        .collect::<Vec<_>>();

    info!(employees = records.len(), "Monthly attendance computed");

    Ok(HttpResponse::Ok().json(MonthlyAttendance {
        month,
        days_in_month: month.days_in_month(),
        employees: records,
    }))
}

/// Correct one attendance day and return the recomputed month
#[utoipa::path(
    post,
    path = "/api/hr/monthly-attendance",
    request_body = AttendanceEdit,
    responses(
        (status = 200, description = "Day updated, month recomputed", body = MonthlyEmployeeRecord),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(
    name = "edit_attendance",
    skip(auth, pool, config, payload),
    fields(emp_code = %payload.emp_code, date = %payload.date, user = %auth.username)
)]
pub async fn edit_attendance_day(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<AttendanceEdit>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let edit = payload.into_inner();

    let employee = match attendance_store::fetch_employee(pool.get_ref(), &edit.emp_code)
        .await
        .map_err(internal_error)?
    {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Employee not found"
            })));
        }
    };

    let shift = match employee.shift.as_deref() {
        Some(code) => attendance_store::fetch_shift(pool.get_ref(), code)
            .await
            .map_err(internal_error)?,
        None => None,
    };

    let flags = evaluate_punches(shift.as_ref(), edit.check_in_time, edit.check_out_time);

    // Stored as sent; the classifier only reads punches once they exist
    let punched = edit.check_in_time.is_some() || edit.check_out_time.is_some();
    if punched && (edit.status.is_leave() || edit.status == DayStatus::Holiday) {
        warn!(status = %edit.status, "Punches recorded on a leave or holiday");
    }

    let day = AttendanceDay {
        late: flags.late,
        early_leave: flags.early_leave,
        excused: edit.violation_excused.unwrap_or(false),
        late_excused: edit.late_excused,
        early_excused: edit.early_excused,
        reason: edit.reason.filter(|r| !r.trim().is_empty()),
        shift: employee.shift.clone(),
        ..AttendanceDay::new(edit.date, edit.status)
    }
    .with_punches(edit.check_in_time, edit.check_out_time);

    attendance_store::upsert_day(pool.get_ref(), &employee.emp_code, &day)
        .await
        .map_err(internal_error)?;

    info!(
        editor_id = auth.user_id,
        status = %day.status,
        late = day.late,
        early_leave = day.early_leave,
        "Attendance day corrected"
    );

    let aggregator = MonthlyAggregator::new(config.upcoming_gate(), config.violation_rules.clone());
    let record = employee_month(
        pool.get_ref(),
        &aggregator,
        &employee,
        YearMonth::of(day.date),
        config.local_now(),
    )
    .await
    .map_err(internal_error)?;

    Ok(HttpResponse::Ok().json(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_payload_accepts_blank_punches_and_legacy_flag() {
        let edit: AttendanceEdit = serde_json::from_value(serde_json::json!({
            "empCode": "EMP-001",
            "date": "2026-03-09",
            "status": "Present",
            "reason": "",
            "checkInTime": "",
            "checkOutTime": "18:05",
            "violationExcused": true
        }))
        .unwrap();

        assert_eq!(edit.check_in_time, None);
        assert_eq!(edit.check_out_time, NaiveTime::from_hms_opt(18, 5, 0));
        assert_eq!(edit.violation_excused, Some(true));
        assert_eq!(edit.late_excused, None);
    }

    #[test]
    fn edit_payload_requires_full_iso_date() {
        let err = serde_json::from_value::<AttendanceEdit>(serde_json::json!({
            "empCode": "EMP-001",
            "date": "2026-3-9",
            "status": "Present"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("invalid date `2026-3-9`, expected YYYY-MM-DD"));
    }

    #[test]
    fn edit_payload_rejects_unknown_status() {
        let result: Result<AttendanceEdit, _> = serde_json::from_value(serde_json::json!({
            "empCode": "EMP-001",
            "date": "2026-03-09",
            "status": "Vacation"
        }));

        assert!(result.is_err());
    }
}
