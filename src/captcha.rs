use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;

#[derive(Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Check a reCAPTCHA token against the siteverify endpoint. Returns whether
/// the token passed; transport and non-2xx failures are errors, a clean
/// rejection is `Ok(false)`.
pub async fn verify(
    client: &reqwest::Client,
    verify_url: &str,
    secret: &str,
    token: &str,
    remote_ip: Option<&str>,
) -> Result<bool, ApiError> {
    let mut params = vec![("secret", secret), ("response", token)];
    if let Some(ip) = remote_ip {
        params.push(("remoteip", ip));
    }

    let response = client.post(verify_url).form(&params).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Captcha(format!("status {}", status)));
    }

    let parsed: VerifyResponse = response.json().await?;
    if !parsed.success {
        warn!("Captcha rejected: {:?}", parsed.error_codes);
    }
    Ok(parsed.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn accepts_valid_tokens() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/siteverify")
                .body_contains("secret=shh")
                .body_contains("response=tok123")
                .body_contains("remoteip=196.25.1.1");
            then.status(200).json_body(serde_json::json!({ "success": true }));
        });

        let client = reqwest::Client::new();
        let ok = verify(
            &client,
            &server.url("/siteverify"),
            "shh",
            "tok123",
            Some("196.25.1.1"),
        )
        .await
        .unwrap();

        mock.assert();
        assert!(ok);
    }

    #[tokio::test]
    async fn reports_rejected_tokens() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/siteverify");
            then.status(200).json_body(serde_json::json!({
                "success": false,
                "error-codes": ["invalid-input-response"]
            }));
        });

        let client = reqwest::Client::new();
        let ok = verify(&client, &server.url("/siteverify"), "shh", "bad", None)
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn upstream_failures_are_errors_not_rejections() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/siteverify");
            then.status(502);
        });

        let client = reqwest::Client::new();
        let err = verify(&client, &server.url("/siteverify"), "shh", "tok", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Captcha(_)));
    }
}
