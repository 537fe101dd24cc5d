use actix_web::error::ErrorBadRequest;
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer};
use sqlx::MySqlPool;

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`)
/// in partial-update payloads. Use with `#[serde(default, deserialize_with = ...)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U32(u32),
    F64(f64),
    Time(NaiveTime),
    Null,
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::F64(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::U32(value)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(value: NaiveTime) -> Self {
        SqlValue::Time(value)
    }
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Collects the columns of a partial update. Column names are always
/// compile-time literals, never taken from the request.
#[derive(Debug, Default)]
pub struct UpdateFields {
    fields: Vec<(&'static str, SqlValue)>,
}

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Into<SqlValue>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.fields.push((column, value.into()));
        }
        self
    }

    /// Sets a nullable column; `Some(None)` writes NULL.
    pub fn set_nullable<T: Into<SqlValue>>(
        &mut self,
        column: &'static str,
        value: Option<Option<T>>,
    ) -> &mut Self {
        match value {
            Some(Some(value)) => self.fields.push((column, value.into())),
            Some(None) => self.fields.push((column, SqlValue::Null)),
            None => {}
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
pub fn build_update_sql(
    table: &str,
    fields: UpdateFields,
    id_column: &str,
    id_value: &str,
) -> Result<SqlUpdate, actix_web::Error> {
    if fields.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let set_clause = fields
        .fields
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values: Vec<SqlValue> = fields.fields.into_iter().map(|(_, v)| v).collect();

    // WHERE id = ?
    values.push(SqlValue::String(id_value.to_string()));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U32(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Time(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_insertion_order() {
        let mut fields = UpdateFields::new();
        fields
            .set("name", Some("Night".to_string()))
            .set::<u32>("grace_minutes", None)
            .set("end_time", NaiveTime::from_hms_opt(6, 0, 0));

        let update = build_update_sql("shifts", fields, "code", "NGT").unwrap();

        assert_eq!(update.sql, "UPDATE shifts SET name = ?, end_time = ? WHERE code = ?");
        assert_eq!(update.values.len(), 3);
        assert_eq!(update.values[2], SqlValue::String("NGT".to_string()));
    }

    #[test]
    fn nullable_column_can_be_cleared() {
        let mut fields = UpdateFields::new();
        fields.set_nullable::<String>("shift_code", Some(None));

        let update = build_update_sql("employees", fields, "emp_code", "E1").unwrap();

        assert_eq!(update.values[0], SqlValue::Null);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(build_update_sql("employees", UpdateFields::new(), "emp_code", "E1").is_err());
    }
}
