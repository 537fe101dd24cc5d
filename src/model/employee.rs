use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "empCode": "EMP-001",
        "name": "John Doe",
        "department": "Engineering",
        "designation": "Software Engineer",
        "shift": "GEN",
        "monthlySalary": 60000.0,
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "Software Engineer", nullable = true)]
    pub designation: Option<String>,

    /// Shift code assigned by default; a day record may override it.
    #[sqlx(rename = "shift_code")]
    #[schema(example = "GEN", nullable = true)]
    pub shift: Option<String>,

    #[schema(example = 60000.0)]
    pub monthly_salary: f64,

    #[schema(example = "active")]
    pub status: String,
}
