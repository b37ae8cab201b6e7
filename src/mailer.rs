use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::ApiError;

pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<EmailAttachment>,
}

#[derive(Serialize)]
struct EmailAttachment {
    filename: String,
    content: String,
}

#[derive(Deserialize)]
struct EmailApiError {
    message: Option<String>,
}

/// Client for the transactional email API (Resend-style JSON over HTTPS).
/// Attachments travel base64-encoded inline. One attempt per send, no retry.
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_url: &str, api_key: &str, from: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }

    pub async fn send(
        &self,
        to: &[String],
        subject: &str,
        html: &str,
        attachments: &[Attachment],
    ) -> Result<(), ApiError> {
        let body = EmailRequest {
            from: &self.from,
            to,
            subject,
            html,
            attachments: attachments
                .iter()
                .map(|a| EmailAttachment {
                    filename: a.filename.clone(),
                    content: STANDARD.encode(&a.content),
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(
                "Sent \"{}\" to {} ({} attachment(s))",
                subject,
                to.join(", "),
                attachments.len()
            );
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<EmailApiError>(&text)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(text);
        Err(ApiError::Mail(format!("status {}: {}", status, message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn posts_json_with_bearer_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test_key")
                .json_body_partial(
                    r#"{
                        "from": "accounts@example.test",
                        "to": ["client@example.test"],
                        "subject": "Your quotation"
                    }"#,
                );
            then.status(200).json_body(serde_json::json!({ "id": "email_1" }));
        });

        let mailer = Mailer::new(&server.base_url(), "re_test_key", "accounts@example.test");
        mailer
            .send(
                &["client@example.test".to_string()],
                "Your quotation",
                "<p>Hi</p>",
                &[],
            )
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn encodes_attachments_as_base64() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/emails").body_contains("JVBERi0xLjU");
            then.status(200).json_body(serde_json::json!({ "id": "email_2" }));
        });

        let mailer = Mailer::new(&server.base_url(), "re_test_key", "accounts@example.test");
        mailer
            .send(
                &["client@example.test".to_string()],
                "Your quotation",
                "<p>Attached</p>",
                &[Attachment {
                    filename: "Quote_Q-1.pdf".to_string(),
                    content: b"%PDF-1.5".to_vec(),
                }],
            )
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn surfaces_api_error_messages() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422)
                .json_body(serde_json::json!({ "message": "invalid `to` address" }));
        });

        let mailer = Mailer::new(&server.base_url(), "re_test_key", "accounts@example.test");
        let err = mailer
            .send(&["nope".to_string()], "Subject", "<p></p>", &[])
            .await
            .unwrap_err();

        match err {
            ApiError::Mail(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("invalid `to` address"));
            }
            other => panic!("expected mail error, got {:?}", other),
        }
    }
}
