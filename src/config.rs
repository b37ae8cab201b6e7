use std::path::PathBuf;

use crate::models::{BankingDetails, Company};

const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";
const DEFAULT_CAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub blob_base_url: String,
    pub blob_token: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub mail_from: String,
    pub porting_desk_email: String,
    pub captcha_secret: Option<String>,
    pub captcha_verify_url: String,
    pub porting_rate_per_minute: u32,
    pub logo_path: PathBuf,
    pub company: Company,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let email_api_key =
            std::env::var("EMAIL_API_KEY").map_err(|_| "EMAIL_API_KEY must be set")?;
        let blob_token = std::env::var("BLOB_TOKEN").map_err(|_| "BLOB_TOKEN must be set")?;

        let blob_base_url = std::env::var("BLOB_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:9000/switchdesk".to_string())
            .trim_end_matches('/')
            .to_string();
        let email_api_url = std::env::var("EMAIL_API_URL")
            .unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "accounts@switchdesk.co.za".to_string());
        let porting_desk_email = std::env::var("PORTING_DESK_EMAIL")
            .unwrap_or_else(|_| "porting@switchdesk.co.za".to_string());

        let captcha_secret = std::env::var("CAPTCHA_SECRET").ok().filter(|s| !s.is_empty());
        let captcha_verify_url = std::env::var("CAPTCHA_VERIFY_URL")
            .unwrap_or_else(|_| DEFAULT_CAPTCHA_VERIFY_URL.to_string());

        let porting_rate_per_minute: u32 = std::env::var("PORTING_RATE_PER_MINUTE")
            .unwrap_or_else(|_| "6".to_string())
            .parse()
            .unwrap_or(6);

        let logo_path = PathBuf::from(
            std::env::var("LOGO_PATH").unwrap_or_else(|_| "assets/logo.png".to_string()),
        );

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            host,
            port,
            blob_base_url,
            blob_token,
            email_api_url,
            email_api_key,
            mail_from,
            porting_desk_email,
            captcha_secret,
            captcha_verify_url,
            porting_rate_per_minute,
            logo_path,
            company: company_from_env(),
        })
    }
}

/// Reseller identity printed on every document. Overridable per request, so
/// these are defaults rather than hard requirements.
fn company_from_env() -> Company {
    let address = std::env::var("COMPANY_ADDRESS")
        .unwrap_or_else(|_| "Unit 4, Waterfall Park; Bekker Road; Midrand 1685".to_string())
        .split(';')
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let banking = match (
        std::env::var("BANK_NAME"),
        std::env::var("BANK_ACCOUNT_NO"),
        std::env::var("BANK_BRANCH_CODE"),
    ) {
        (Ok(bank), Ok(account_no), Ok(branch_code)) => Some(BankingDetails {
            bank,
            account_no,
            branch_code,
        }),
        _ => Some(BankingDetails {
            bank: "First National Bank".to_string(),
            account_no: "62841077301".to_string(),
            branch_code: "250655".to_string(),
        }),
    };

    Company {
        name: std::env::var("COMPANY_NAME")
            .unwrap_or_else(|_| "Switchdesk Communications (Pty) Ltd".to_string()),
        registration_no: std::env::var("COMPANY_REG_NO")
            .unwrap_or_else(|_| "2019/384021/07".to_string()),
        vat_no: std::env::var("COMPANY_VAT_NO").unwrap_or_else(|_| "4820291835".to_string()),
        address,
        phone: std::env::var("COMPANY_PHONE").unwrap_or_else(|_| "+27 10 023 4400".to_string()),
        email: std::env::var("COMPANY_EMAIL")
            .unwrap_or_else(|_| "accounts@switchdesk.co.za".to_string()),
        banking,
    }
}
