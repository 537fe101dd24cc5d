use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use chrono_tz::Tz;
use dotenvy::dotenv;

use crate::attendance::{RateBasis, UpcomingGate, ViolationRules};
use crate::model::attendance::punch_time;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_level: tracing::Level,

    // Attendance policy
    pub timezone: Tz,
    pub attendance_cutoff: NaiveTime,
    pub violation_rules: ViolationRules,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = ViolationRules::default();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_level: parsed_or("LOG_LEVEL", tracing::Level::DEBUG)?,

            timezone: parsed_or("ATTENDANCE_TIMEZONE", Tz::UTC)?,
            attendance_cutoff: match env::var("ATTENDANCE_CUTOFF") {
                Ok(raw) => punch_time::parse(&raw).context("ATTENDANCE_CUTOFF")?,
                Err(_) => UpcomingGate::default_cutoff(),
            },
            violation_rules: ViolationRules {
                late: parsed_or("DEDUCT_LATE", defaults.late)?,
                early: parsed_or("DEDUCT_EARLY", defaults.early)?,
                late_and_early: parsed_or("DEDUCT_LATE_AND_EARLY", defaults.late_and_early)?,
                partial_punch: parsed_or("DEDUCT_PARTIAL_PUNCH", defaults.partial_punch)?,
                absent: parsed_or("DEDUCT_ABSENT", defaults.absent)?,
                leave_without_inform: parsed_or(
                    "DEDUCT_LEAVE_WITHOUT_INFORM",
                    defaults.leave_without_inform,
                )?,
                unpaid_leave: parsed_or("DEDUCT_UNPAID_LEAVE", defaults.unpaid_leave)?,
                half_day: parsed_or("DEDUCT_HALF_DAY", defaults.half_day)?,
                rate_basis: parsed_or("SALARY_RATE_BASIS", RateBasis::CalendarDays)?,
            },
        })
    }

    pub fn upcoming_gate(&self) -> UpcomingGate {
        UpcomingGate::new(self.attendance_cutoff)
    }

    /// Current wall-clock time in the organisation's timezone.
    pub fn local_now(&self) -> chrono::NaiveDateTime {
        chrono::Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key}=`{raw}`: {e}")),
        Err(_) => Ok(default),
    }
}
