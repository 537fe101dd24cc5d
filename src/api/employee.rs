use crate::{
    api::{internal_error, row_was_updated},
    auth::auth::AuthUser,
    model::employee::Employee,
    utils::attendance_store,
    utils::db_utils::{UpdateFields, build_update_sql, double_option, execute_update},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "Software Engineer")]
    pub designation: Option<String>,
    #[schema(example = "GEN")]
    pub shift: Option<String>,
    #[schema(example = 60000.0)]
    pub monthly_salary: f64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department: Option<String>,
    pub status: Option<String>,
    /// Matches name or employee code
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Partial update. `null` clears a nullable column, a missing key leaves it alone.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub designation: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub shift: Option<Option<String>>,
    pub monthly_salary: Option<f64>,
    #[schema(example = "inactive")]
    pub status: Option<String>,
}

impl UpdateEmployee {
    fn validate(&self) -> Result<(), &'static str> {
        if self.monthly_salary.is_some_and(|salary| salary < 0.0) {
            return Err("monthlySalary must not be negative");
        }
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err("name must not be empty");
        }
        Ok(())
    }

    fn into_fields(self) -> UpdateFields {
        let mut fields = UpdateFields::new();
        fields
            .set("name", self.name)
            .set_nullable("department", self.department)
            .set_nullable("designation", self.designation)
            .set_nullable("shift_code", self.shift)
            .set("monthly_salary", self.monthly_salary)
            .set("status", self.status);
        fields
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/hr/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Object, example = json!({
            "message": "Employee created successfully"
        })),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Employee code already exists"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.emp_code.trim().is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "empCode and name must not be empty"
        })));
    }
    if payload.monthly_salary < 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "monthlySalary must not be negative"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (emp_code, name, department, designation, shift_code, monthly_salary, status)
        VALUES (?, ?, ?, ?, ?, ?, 'active')
        "#,
    )
    .bind(payload.emp_code.trim())
    .bind(&payload.name)
    .bind(&payload.department)
    .bind(&payload.designation)
    .bind(&payload.shift)
    .bind(payload.monthly_salary)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created successfully"
        }))),
        Err(e) => {
            // Duplicate employee code
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Employee code already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to Create Employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message":"Something went wrong, Contact with system admin"
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/hr/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(department) = &query.department {
        conditions.push("department = ?");
        bindings.push(department.clone());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR emp_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT emp_code, name, department, designation, shift_code, monthly_salary, status \
         FROM employees {} ORDER BY emp_code LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/hr/employees/{emp_code}",
    params(
        ("emp_code", Path, description = "Employee code")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = Object, example = json!({
            "message": "Employee updated successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let emp_code = path.into_inner();
    let body = body.into_inner();

    if let Err(message) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    let update = build_update_sql("employees", body.into_fields(), "emp_code", &emp_code)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, emp_code = %emp_code, "Failed to update employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let exists = async {
        attendance_store::fetch_employee(pool.get_ref(), &emp_code)
            .await
            .map(|employee| employee.is_some())
    };
    if !row_was_updated(affected, exists).await? {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/hr/employees/{emp_code}",
    params(
        ("emp_code", Path, description = "Employee code")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let emp_code = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM employees WHERE emp_code = ?"#)
        .bind(&emp_code)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Employee not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, emp_code = %emp_code, "Failed to delete employee");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Employee by code
#[utoipa::path(
    get,
    path = "/api/hr/employees/{emp_code}",
    params(
        ("emp_code", Path, description = "Employee code")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let emp_code = path.into_inner();
    auth.require_access_to(&emp_code)?;

    let employee = attendance_store::fetch_employee(pool.get_ref(), &emp_code)
        .await
        .map_err(internal_error)?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
