use axum::extract::{ConnectInfo, Multipart, State};
use axum::Json;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Context;

use crate::captcha;
use crate::error::ApiError;
use crate::mailer::Attachment;
use crate::models::PortingRequest;
use crate::pdf;
use crate::state::AppState;
use crate::templates;

use super::render_pdf;

#[derive(Default)]
struct PortingForm {
    account_holder: String,
    id_number: String,
    current_provider: String,
    provider_account_no: String,
    numbers: String,
    service_address: String,
    email: String,
    captcha_token: String,
    /// Supporting document (copy of ID / company registration).
    document: Option<(String, Vec<u8>)>,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c == '\n')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Public endpoint: rate-limited by IP and captcha-gated when a secret is
/// configured. Builds the LOA and mails it to the porting desk (and the
/// requester, when they left an address) with the supporting document
/// attached.
pub async fn submit_porting(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ip = addr.ip().to_string();
    if !state.limiter.check(&ip) {
        return Err(ApiError::RateLimited);
    }

    let mut form = PortingForm::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "document" {
            let filename = field.file_name().unwrap_or("document.pdf").to_string();
            if let Ok(data) = field.bytes().await {
                if !data.is_empty() {
                    form.document = Some((filename, data.to_vec()));
                }
            }
        } else if let Ok(text) = field.text().await {
            match name.as_str() {
                "accountHolder" => form.account_holder = text,
                "idNumber" => form.id_number = text,
                "currentProvider" => form.current_provider = text,
                "providerAccountNo" => form.provider_account_no = text,
                "numbers" => form.numbers = text,
                "serviceAddress" => form.service_address = text,
                "email" => form.email = text,
                "captchaToken" => form.captcha_token = text,
                _ => {}
            }
        }
    }

    if let Some(secret) = &state.config.captcha_secret {
        let token = form.captcha_token.trim();
        if token.is_empty() {
            return Err(ApiError::BadRequest("captcha token is required".to_string()));
        }
        let passed = captcha::verify(
            &state.http,
            &state.config.captcha_verify_url,
            secret,
            token,
            Some(&ip),
        )
        .await?;
        if !passed {
            return Err(ApiError::CaptchaRejected);
        }
    }

    if form.account_holder.trim().is_empty() || form.current_provider.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "account holder and current provider are required".to_string(),
        ));
    }
    let numbers = split_list(&form.numbers);
    if numbers.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one number to port is required".to_string(),
        ));
    }

    let porting = PortingRequest {
        account_holder: form.account_holder.trim().to_string(),
        id_number: form.id_number.trim().to_string(),
        current_provider: form.current_provider.trim().to_string(),
        provider_account_no: form.provider_account_no.trim().to_string(),
        numbers,
        service_address: split_list(&form.service_address),
        email: form.email.trim().to_string(),
    };

    let company = state.config.company.clone();
    let logo = state.config.logo_path.clone();
    let porting_for_build = porting.clone();
    let bytes =
        render_pdf(move || pdf::build_porting_loa(&company, &porting_for_build, Some(&logo)))
            .await?;

    let mut attachments = vec![Attachment {
        filename: format!("LOA_{}.pdf", porting.account_holder.replace(' ', "_")),
        content: bytes,
    }];
    if let Some((filename, content)) = form.document {
        attachments.push(Attachment { filename, content });
    }

    let mut to = vec![state.config.porting_desk_email.clone()];
    if porting.email.contains('@') {
        to.push(porting.email.clone());
    }

    let mut ctx = Context::new();
    ctx.insert("account_holder", &porting.account_holder);
    ctx.insert("current_provider", &porting.current_provider);
    ctx.insert("numbers", &porting.numbers);
    ctx.insert("company_name", &state.config.company.name);
    let html = templates::render("porting_email.html", &ctx)?;

    state
        .mailer
        .send(
            &to,
            &format!("Number porting request - {}", porting.account_holder),
            &html,
            &attachments,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "numbers": porting.numbers.len(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_numbers_on_common_separators() {
        assert_eq!(
            split_list("+27 11 447 2210, +27 11 447 2211;+27 11 447 2212\n"),
            vec![
                "+27 11 447 2210".to_string(),
                "+27 11 447 2211".to_string(),
                "+27 11 447 2212".to_string(),
            ]
        );
        assert!(split_list("  \n ").is_empty());
    }
}
