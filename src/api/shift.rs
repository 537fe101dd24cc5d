use crate::{
    api::row_was_updated,
    auth::auth::AuthUser,
    model::attendance::punch_time,
    model::shift::Shift,
    utils::attendance_store,
    utils::db_utils::{UpdateFields, build_update_sql, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShift {
    pub name: Option<String>,
    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "punch_time")]
    #[schema(value_type = Option<String>, example = "18:30")]
    pub end_time: Option<NaiveTime>,
    pub grace_minutes: Option<u32>,
}

/// List shifts
#[utoipa::path(
    get,
    path = "/api/hr/shifts",
    responses(
        (status = 200, description = "All shifts", body = [Shift]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_shifts(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let shifts = sqlx::query_as::<_, Shift>(
        "SELECT code, name, start_time, end_time, grace_minutes FROM shifts ORDER BY code",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch shifts");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(shifts))
}

/// Create shift
#[utoipa::path(
    post,
    path = "/api/hr/shifts",
    request_body = Shift,
    responses(
        (status = 201, description = "Shift created", body = Object, example = json!({
            "message": "Shift created successfully"
        })),
        (status = 409, description = "Shift code already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_shift(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Shift>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let shift = payload.into_inner();
    if shift.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "code must not be empty"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO shifts (code, name, start_time, end_time, grace_minutes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(shift.code.trim())
    .bind(&shift.name)
    .bind(shift.start_time)
    .bind(shift.end_time)
    .bind(shift.grace_minutes)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!(code = %shift.code, "Shift created");
            Ok(HttpResponse::Created().json(json!({
                "message": "Shift created successfully"
            })))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23000") => {
            Ok(HttpResponse::Conflict().json(json!({
                "message": "Shift code already exists"
            })))
        }
        Err(e) => {
            error!(error = %e, "Failed to create shift");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            })))
        }
    }
}

/// Update shift
#[utoipa::path(
    put,
    path = "/api/hr/shifts/{code}",
    params(
        ("code", Path, description = "Shift code")
    ),
    request_body = UpdateShift,
    responses(
        (status = 200, description = "Shift updated", body = Object, example = json!({
            "message": "Shift updated successfully"
        })),
        (status = 400, description = "No fields provided"),
        (status = 404, description = "Shift not found", body = Object, example = json!({
            "message": "Shift not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_shift(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<UpdateShift>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let code = path.into_inner();
    let body = body.into_inner();

    let mut fields = UpdateFields::new();
    fields
        .set("name", body.name)
        .set("start_time", body.start_time)
        .set("end_time", body.end_time)
        .set("grace_minutes", body.grace_minutes);

    let update = build_update_sql("shifts", fields, "code", &code)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, code = %code, "Failed to update shift");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let exists = async {
        attendance_store::fetch_shift(pool.get_ref(), &code)
            .await
            .map(|shift| shift.is_some())
    };
    if !row_was_updated(affected, exists).await? {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Shift updated successfully"
    })))
}

/// Delete shift
#[utoipa::path(
    delete,
    path = "/api/hr/shifts/{code}",
    params(
        ("code", Path, description = "Shift code")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Shift not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_shift(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let code = path.into_inner();

    let res = sqlx::query("DELETE FROM shifts WHERE code = ?")
        .bind(&code)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, code = %code, "Failed to delete shift");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if res.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
