use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::attendance::punch_time;

/// A working shift. Check-ins after `start_time + grace_minutes` are late,
/// check-outs before `end_time` are early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[schema(example = "GEN")]
    pub code: String,

    #[schema(example = "General")]
    pub name: String,

    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,

    #[serde(with = "hh_mm")]
    #[schema(value_type = String, example = "18:00")]
    pub end_time: NaiveTime,

    #[schema(example = 15)]
    pub grace_minutes: u32,
}

impl Shift {
    /// Latest check-in that still counts as on time.
    pub fn late_after(&self) -> NaiveTime {
        // NaiveTime arithmetic wraps at midnight
        self.start_time + Duration::minutes(i64::from(self.grace_minutes))
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::punch_time;

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        punch_time::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_decodes_short_times() {
        let shift: Shift = serde_json::from_value(serde_json::json!({
            "code": "GEN",
            "name": "General",
            "startTime": "09:00",
            "endTime": "18:00",
            "graceMinutes": 15
        }))
        .unwrap();

        assert_eq!(shift.late_after(), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert_eq!(
            serde_json::to_value(&shift).unwrap()["endTime"],
            serde_json::json!("18:00")
        );
    }
}
