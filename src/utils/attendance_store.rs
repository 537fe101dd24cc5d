use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use futures_util::TryStreamExt;
use sqlx::{FromRow, MySqlPool};

use crate::model::attendance::{AttendanceDay, DayStatus};
use crate::model::employee::Employee;
use crate::model::paid_leave::Quarter;
use crate::model::shift::Shift;

/// Row shape of the `attendance` table.
#[derive(Debug, FromRow)]
pub struct AttendanceRow {
    pub emp_code: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub late: bool,
    pub early_leave: bool,
    pub excused: bool,
    pub late_excused: Option<bool>,
    pub early_excused: Option<bool>,
    pub reason: Option<String>,
    pub shift_code: Option<String>,
}

impl AttendanceRow {
    pub fn into_day(self) -> Result<(String, AttendanceDay)> {
        let status = DayStatus::parse(&self.status)
            .with_context(|| format!("attendance row {} {}", self.emp_code, self.date))?;

        let day = AttendanceDay {
            date: self.date,
            status,
            check_in: self.check_in,
            check_out: self.check_out,
            late: self.late,
            early_leave: self.early_leave,
            excused: self.excused,
            late_excused: self.late_excused,
            early_excused: self.early_excused,
            reason: self.reason,
            shift: self.shift_code,
        };

        Ok((self.emp_code, day))
    }
}

const EMPLOYEE_COLUMNS: &str =
    "emp_code, name, department, designation, shift_code, monthly_salary, status";

/// Active employees, or the single employee asked for (whatever its status).
pub async fn fetch_employees(pool: &MySqlPool, emp_code: Option<&str>) -> Result<Vec<Employee>> {
    let employees = match emp_code {
        Some(code) => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE emp_code = ?"
            ))
            .bind(code)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE status = 'active' ORDER BY emp_code"
            ))
            .fetch_all(pool)
            .await
        }
    };

    employees.context("Failed to fetch employees")
}

pub async fn fetch_employee(pool: &MySqlPool, emp_code: &str) -> Result<Option<Employee>> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE emp_code = ?"
    ))
    .bind(emp_code)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch employee")
}

pub async fn fetch_shift(pool: &MySqlPool, code: &str) -> Result<Option<Shift>> {
    sqlx::query_as::<_, Shift>(
        "SELECT code, name, start_time, end_time, grace_minutes FROM shifts WHERE code = ?",
    )
    .bind(code)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch shift")
}

/// Attendance days in `[from, to]`, grouped by employee and ordered by date.
pub async fn fetch_days(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
    emp_code: Option<&str>,
    status: Option<DayStatus>,
) -> Result<HashMap<String, Vec<AttendanceDay>>> {
    let mut sql = String::from(
        r#"
        SELECT emp_code, date, status, check_in, check_out, late, early_leave,
               excused, late_excused, early_excused, reason, shift_code
        FROM attendance
        WHERE date BETWEEN ? AND ?
        "#,
    );
    if emp_code.is_some() {
        sql.push_str(" AND emp_code = ?");
    }
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY emp_code, date");

    let mut query = sqlx::query_as::<_, AttendanceRow>(&sql).bind(from).bind(to);
    if let Some(code) = emp_code {
        query = query.bind(code);
    }
    if let Some(status) = status {
        query = query.bind(status.to_string());
    }

    let mut rows = query.fetch(pool);
    let mut grouped: HashMap<String, Vec<AttendanceDay>> = HashMap::new();

    while let Some(row) = rows.try_next().await.context("Failed to fetch attendance")? {
        let (emp_code, day) = row.into_day()?;
        grouped.entry(emp_code).or_default().push(day);
    }

    Ok(grouped)
}

/// Inserts or replaces the record for `(emp_code, day.date)`.
pub async fn upsert_day(pool: &MySqlPool, emp_code: &str, day: &AttendanceDay) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO attendance
            (emp_code, date, status, check_in, check_out, late, early_leave,
             excused, late_excused, early_excused, reason, shift_code)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            status = VALUES(status),
            check_in = VALUES(check_in),
            check_out = VALUES(check_out),
            late = VALUES(late),
            early_leave = VALUES(early_leave),
            excused = VALUES(excused),
            late_excused = VALUES(late_excused),
            early_excused = VALUES(early_excused),
            reason = VALUES(reason),
            shift_code = VALUES(shift_code)
        "#,
    )
    .bind(emp_code)
    .bind(day.date)
    .bind(day.status.as_ref())
    .bind(day.check_in)
    .bind(day.check_out)
    .bind(day.late)
    .bind(day.early_leave)
    .bind(day.excused)
    .bind(day.late_excused)
    .bind(day.early_excused)
    .bind(day.reason.as_deref())
    .bind(day.shift.as_deref())
    .execute(pool)
    .await
    .context("Failed to upsert attendance")?;

    Ok(())
}

/// Paid-leave allocations of `year`, per employee, indexed by quarter.
pub async fn fetch_allocations(
    pool: &MySqlPool,
    year: i32,
    emp_code: Option<&str>,
) -> Result<HashMap<String, [u32; 4]>> {
    let mut sql = String::from(
        "SELECT emp_code, quarter, allocated FROM paid_leave_allocations WHERE year = ?",
    );
    if emp_code.is_some() {
        sql.push_str(" AND emp_code = ?");
    }

    let mut query = sqlx::query_as::<_, (String, u8, u32)>(&sql).bind(year);
    if let Some(code) = emp_code {
        query = query.bind(code);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to fetch paid leave allocations")?;

    let mut allocations: HashMap<String, [u32; 4]> = HashMap::new();
    for (emp_code, quarter, allocated) in rows {
        let quarter = Quarter::try_from(quarter)
            .with_context(|| format!("paid leave allocation for {emp_code} {year}"))?;
        allocations.entry(emp_code).or_default()[quarter.index()] = allocated;
    }

    Ok(allocations)
}

pub async fn upsert_allocation(
    pool: &MySqlPool,
    emp_code: &str,
    year: i32,
    quarter: Quarter,
    allocated: u32,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO paid_leave_allocations (emp_code, year, quarter, allocated)
        VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE allocated = VALUES(allocated)
        "#,
    )
    .bind(emp_code)
    .bind(year)
    .bind(quarter as u8)
    .bind(allocated)
    .execute(pool)
    .await
    .context("Failed to upsert paid leave allocation")?;

    Ok(())
}
