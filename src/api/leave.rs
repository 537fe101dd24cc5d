use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::api::internal_error;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::DayStatus;
use crate::model::paid_leave::{PaidLeaveQuarterRecord, Quarter};
use crate::utils::attendance_store;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveQuery {
    /// Defaults to the current year
    #[schema(example = 2026)]
    pub year: Option<i32>,
    #[schema(example = "EMP-001")]
    pub emp_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    #[schema(example = 2026)]
    pub year: i32,
    /// 1..=4
    #[schema(example = 2)]
    pub quarter: u8,
    #[schema(example = 3)]
    pub allocated: u32,
}

/// Paid leave taken per quarter against the allocation
#[utoipa::path(
    get,
    path = "/api/hr/leaves",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Quarterly paid leave per employee", body = [PaidLeaveQuarterRecord]),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "paid_leave_quarters", skip(auth, pool, config))]
pub async fn paid_leave_quarters(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<LeaveQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let year = query.year.unwrap_or_else(|| config.local_now().year());

    let scope = match (auth.role.is_hr_or_admin(), query.emp_code) {
        (true, code) => code,
        (false, Some(code)) => {
            auth.require_access_to(&code)?;
            Some(code)
        }
        (false, None) => match auth.emp_code.clone() {
            Some(code) => Some(code),
            None => return Err(actix_web::error::ErrorForbidden("No employee profile")),
        },
    };

    let (Some(from), Some(to)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": format!("invalid year {year}")
        })));
    };

    let employees = attendance_store::fetch_employees(pool.get_ref(), scope.as_deref())
        .await
        .map_err(internal_error)?;

    let mut allocations = attendance_store::fetch_allocations(pool.get_ref(), year, scope.as_deref())
        .await
        .map_err(internal_error)?;

    let mut days = attendance_store::fetch_days(
        pool.get_ref(),
        from,
        to,
        scope.as_deref(),
        Some(DayStatus::PaidLeave),
    )
    .await
    .map_err(internal_error)?;

    let records = employees
        .iter()
        .map(|employee| {
            let code = employee.emp_code.as_str();
            PaidLeaveQuarterRecord::build(
                code,
                year,
                allocations.remove(code).unwrap_or_default(),
                &days.remove(code).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(records))
}

/// Set an employee's paid leave allocation for one quarter
#[utoipa::path(
    post,
    path = "/api/hr/leaves",
    request_body = AllocationRequest,
    responses(
        (status = 200, description = "Allocation saved", body = PaidLeaveQuarterRecord),
        (status = 400, description = "Invalid quarter"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "allocate_paid_leave", skip(auth, pool, payload), fields(emp_code = %payload.emp_code))]
pub async fn allocate_paid_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AllocationRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let request = payload.into_inner();
    let quarter = Quarter::try_from(request.quarter)?;

    if attendance_store::fetch_employee(pool.get_ref(), &request.emp_code)
        .await
        .map_err(internal_error)?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    attendance_store::upsert_allocation(
        pool.get_ref(),
        &request.emp_code,
        request.year,
        quarter,
        request.allocated,
    )
    .await
    .map_err(internal_error)?;

    info!(year = request.year, ?quarter, allocated = request.allocated, "Paid leave allocated");

    let allocations = attendance_store::fetch_allocations(pool.get_ref(), request.year, Some(&request.emp_code))
        .await
        .map_err(internal_error)?
        .remove(&request.emp_code)
        .unwrap_or_default();

    let days = match (
        NaiveDate::from_ymd_opt(request.year, 1, 1),
        NaiveDate::from_ymd_opt(request.year, 12, 31),
    ) {
        (Some(from), Some(to)) => attendance_store::fetch_days(
            pool.get_ref(),
            from,
            to,
            Some(&request.emp_code),
            Some(DayStatus::PaidLeave),
        )
        .await
        .map_err(internal_error)?
        .remove(&request.emp_code)
        .unwrap_or_default(),
        _ => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(PaidLeaveQuarterRecord::build(
        &request.emp_code,
        request.year,
        allocations,
        &days,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_query_fields_are_optional() {
        let query: LeaveQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.year.is_none());
        assert!(query.emp_code.is_none());
    }

    #[test]
    fn out_of_range_quarter_is_rejected() {
        let request: AllocationRequest = serde_json::from_value(json!({
            "empCode": "EMP-001",
            "year": 2026,
            "quarter": 5,
            "allocated": 2
        }))
        .unwrap();

        assert!(Quarter::try_from(request.quarter).is_err());
    }
}
