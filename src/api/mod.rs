pub mod employee;
pub mod leave;
pub mod monthly_attendance;
pub mod shift;

use std::future::Future;

/// Logs a store failure and hides its details from the client.
pub(crate) fn internal_error(e: anyhow::Error) -> actix_web::Error {
    tracing::error!(error = ?e, "Request failed");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Whether an UPDATE hit an existing row. MySQL reports 0 affected rows when
/// the values did not change, so `exists` is only awaited for a zero.
pub(crate) async fn row_was_updated<F>(affected: u64, exists: F) -> actix_web::Result<bool>
where
    F: Future<Output = anyhow::Result<bool>>,
{
    if affected > 0 {
        return Ok(true);
    }
    exists.await.map_err(internal_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::ready;

    #[actix_web::test]
    async fn unchanged_existing_row_counts_as_updated() {
        assert!(row_was_updated(0, ready(Ok(true))).await.unwrap());
    }

    #[actix_web::test]
    async fn zero_rows_and_no_row_is_missing() {
        assert!(!row_was_updated(0, ready(Ok(false))).await.unwrap());
    }

    #[actix_web::test]
    async fn affected_rows_skip_the_existence_check() {
        let lookup = async { Err::<bool, _>(anyhow::anyhow!("store must not be queried")) };
        assert!(row_was_updated(1, lookup).await.unwrap());
    }

    #[actix_web::test]
    async fn failed_lookup_is_internal_error() {
        let err = row_was_updated(0, ready(Err(anyhow::anyhow!("connection reset"))))
            .await
            .unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
