mod documents;
mod orders;
mod porting;

pub use documents::{invoice_email, invoice_pdf, quote_email, quote_pdf, sla_pdf};
pub use orders::{generate_order_documents, order_archive, order_file, order_links};
pub use porting::submit_porting;

use axum::body::Body;
use axum::response::Response;
use axum::Json;

use crate::error::ApiError;
use crate::models::LineItem;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

pub(crate) fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    Response::builder()
        .header("Content-Type", "application/pdf")
        .header(
            "Content-Disposition",
            format!("inline; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .unwrap()
}

/// genpdf rendering is synchronous CPU work; run it off the async worker
/// threads.
pub(crate) async fn render_pdf<F>(build: F) -> Result<Vec<u8>, ApiError>
where
    F: FnOnce() -> Result<Vec<u8>, String> + Send + 'static,
{
    tokio::task::spawn_blocking(build)
        .await
        .map_err(|e| ApiError::Pdf(e.to_string()))?
        .map_err(ApiError::Pdf)
}

pub(crate) fn require_items(items: &[LineItem]) -> Result<(), ApiError> {
    if items.is_empty() {
        Err(ApiError::BadRequest(
            "at least one line item is required".to_string(),
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn recipient(explicit: Option<&str>, fallback: &str) -> Result<String, ApiError> {
    let address = explicit.unwrap_or(fallback).trim();
    if address.is_empty() || !address.contains('@') {
        return Err(ApiError::BadRequest(format!(
            "invalid recipient address: {:?}",
            address
        )));
    }
    Ok(address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_prefers_explicit_address() {
        assert_eq!(
            recipient(Some("a@b.test"), "c@d.test").unwrap(),
            "a@b.test"
        );
        assert_eq!(recipient(None, "c@d.test").unwrap(), "c@d.test");
    }

    #[test]
    fn recipient_rejects_junk() {
        assert!(recipient(None, "").is_err());
        assert!(recipient(Some("   "), "c@d.test").is_err());
        assert!(recipient(Some("not-an-address"), "").is_err());
    }
}
