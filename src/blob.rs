use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use uuid::Uuid;

use crate::error::ApiError;

pub fn generate_order_id() -> String {
    format!(
        "{}-{}",
        Utc::now().format("%Y%m%d"),
        &Uuid::new_v4().to_string()[..8]
    )
}

pub fn generate_reference(prefix: &str) -> String {
    format!("{}-{}", prefix, generate_order_id())
}

/// Order ids come off the URL and end up in blob paths, so only a tame
/// character set is allowed through.
pub fn sanitize_order_id(order_id: &str) -> Result<&str, ApiError> {
    let ok = !order_id.is_empty()
        && order_id.len() <= 64
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(order_id)
    } else {
        Err(ApiError::BadRequest(format!(
            "invalid order id: {:?}",
            order_id
        )))
    }
}

pub fn sanitize_filename(filename: &str) -> Result<&str, ApiError> {
    if filename.is_empty() || filename.contains("..") || filename.contains('/') {
        Err(ApiError::BadRequest(format!(
            "invalid filename: {:?}",
            filename
        )))
    } else {
        Ok(filename)
    }
}

pub fn doc_filename(kind: &str, order_id: &str) -> String {
    format!("{}-{}.pdf", kind, order_id)
}

pub fn order_path(order_id: &str, filename: &str) -> String {
    format!("orders/{}/{}", order_id, filename)
}

/// Thin client for the blob storage service: bearer-authenticated PUT/GET
/// against `{base}/{path}`. Objects are written once and never updated.
#[derive(Clone)]
pub struct BlobStore {
    client: Client,
    base_url: String,
    token: String,
}

impl BlobStore {
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Upload an object and return its public URL.
    pub async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ApiError> {
        let url = self.public_url(path);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Blob(format!(
                "upload of {} failed with status {}",
                path, status
            )));
        }

        tracing::info!("Stored {} ({})", path, content_type);
        Ok(url)
    }

    pub async fn get(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.public_url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Blob(format!(
                "fetch of {} failed with status {}",
                path, status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn order_ids_have_date_prefix() {
        let id = generate_order_id();
        let (date, suffix) = id.split_once('-').unwrap();
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn paths_follow_the_order_layout() {
        assert_eq!(doc_filename("quote", "20260808-ab12cd34"), "quote-20260808-ab12cd34.pdf");
        assert_eq!(
            order_path("20260808-ab12cd34", "links.json"),
            "orders/20260808-ab12cd34/links.json"
        );
    }

    #[test]
    fn rejects_hostile_order_ids() {
        assert!(sanitize_order_id("ORD-2026_001").is_ok());
        assert!(sanitize_order_id("").is_err());
        assert!(sanitize_order_id("../secrets").is_err());
        assert!(sanitize_order_id("a/b").is_err());
        assert!(sanitize_order_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn rejects_hostile_filenames() {
        assert!(sanitize_filename("quote-1.pdf").is_ok());
        assert!(sanitize_filename("../meta.json").is_err());
        assert!(sanitize_filename("a/b.pdf").is_err());
    }

    #[tokio::test]
    async fn put_sends_bearer_token_and_returns_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/orders/ord-1/quote-ord-1.pdf")
                .header("authorization", "Bearer blob-token")
                .header("content-type", "application/pdf");
            then.status(200);
        });

        let store = BlobStore::new(&server.base_url(), "blob-token");
        let url = store
            .put("orders/ord-1/quote-ord-1.pdf", b"%PDF-1.5".to_vec(), "application/pdf")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(url, format!("{}/orders/ord-1/quote-ord-1.pdf", server.base_url()));
    }

    #[tokio::test]
    async fn get_maps_missing_objects_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orders/ord-9/links.json");
            then.status(404);
        });

        let store = BlobStore::new(&server.base_url(), "blob-token");
        let err = store.get("orders/ord-9/links.json").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_returns_stored_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orders/ord-2/meta.json");
            then.status(200).body(r#"{"orderId":"ord-2"}"#);
        });

        let store = BlobStore::new(&server.base_url(), "blob-token");
        let bytes = store.get("orders/ord-2/meta.json").await.unwrap();
        assert_eq!(bytes, br#"{"orderId":"ord-2"}"#);
    }
}
