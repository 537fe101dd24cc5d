use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::leave::{AllocationRequest, LeaveQuery};
use crate::api::monthly_attendance::{AttendanceEdit, MonthQuery};
use crate::api::shift::UpdateShift;
use crate::attendance::Tone;
use crate::model::attendance::{AttendanceDay, DayStatus};
use crate::model::employee::Employee;
use crate::model::monthly::{ClassifiedDay, MonthlyAttendance, MonthlyEmployeeRecord};
use crate::model::paid_leave::{PaidLeaveQuarterRecord, QuarterBalance};
use crate::model::shift::Shift;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "0.1.0",
        description = r#"
## Monthly Attendance & Payroll Deductions

Classifies every recorded day of an employee's month, resolves which lateness
and early-leave violations were excused, and totals the salary deduction.

### 🔹 Key Features
- **Monthly attendance**
  - Per-day classification with a display tone and short status code
  - Days that have not started yet (today before the cutoff) are marked upcoming and never penalised
  - HR corrections recompute late/early flags from the employee's shift
- **Employees & shifts**
  - Create, update, list and remove employee profiles and working shifts
- **Paid leave**
  - Quarterly paid leave taken against each employee's allocation

### 🔐 Security
All endpoints require a **JWT Bearer** access token.
Writes are limited to **Admin** and **HR**; employees only see their own records.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::monthly_attendance::get_monthly_attendance,
        crate::api::monthly_attendance::edit_attendance_day,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::shift::list_shifts,
        crate::api::shift::create_shift,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,

        crate::api::leave::paid_leave_quarters,
        crate::api::leave::allocate_paid_leave
    ),
    components(
        schemas(
            MonthQuery,
            AttendanceEdit,
            AttendanceDay,
            DayStatus,
            Tone,
            ClassifiedDay,
            MonthlyEmployeeRecord,
            MonthlyAttendance,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            Employee,
            EmployeeListResponse,
            Shift,
            UpdateShift,
            LeaveQuery,
            AllocationRequest,
            QuarterBalance,
            PaidLeaveQuarterRecord
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Monthly attendance and deductions"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Shift", description = "Working shift APIs"),
        (name = "Leave", description = "Paid leave quarter APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
