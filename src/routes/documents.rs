use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tera::Context;

use crate::blob::generate_reference;
use crate::error::ApiError;
use crate::mailer::Attachment;
use crate::models::{InvoiceRequest, QuoteRequest, SlaRequest, Totals};
use crate::money::format_rands;
use crate::pdf;
use crate::state::AppState;
use crate::templates;

use super::{pdf_response, recipient, render_pdf, require_items};

const DEFAULT_QUOTE_VALID_DAYS: u32 = 14;
const DEFAULT_INVOICE_DUE_DAYS: u32 = 30;

async fn build_quote(
    state: &AppState,
    req: QuoteRequest,
) -> Result<(Vec<u8>, String), ApiError> {
    let company = req.company.unwrap_or_else(|| state.config.company.clone());
    let number = req.number.unwrap_or_else(|| generate_reference("Q"));
    let valid_days = req.valid_days.unwrap_or(DEFAULT_QUOTE_VALID_DAYS);
    let logo = state.config.logo_path.clone();
    let customer = req.customer;
    let items = req.items;
    let notes = req.notes;

    let number_for_build = number.clone();
    let bytes = render_pdf(move || {
        pdf::build_quote(
            &company,
            &customer,
            &items,
            &number_for_build,
            valid_days,
            notes.as_deref(),
            Some(&logo),
        )
    })
    .await?;
    Ok((bytes, number))
}

async fn build_invoice(
    state: &AppState,
    req: InvoiceRequest,
) -> Result<(Vec<u8>, String), ApiError> {
    let company = req.company.unwrap_or_else(|| state.config.company.clone());
    let number = req.number.unwrap_or_else(|| generate_reference("INV"));
    let due_days = req.due_days.unwrap_or(DEFAULT_INVOICE_DUE_DAYS);
    let logo = state.config.logo_path.clone();
    let customer = req.customer;
    let items = req.items;
    let notes = req.notes;

    let number_for_build = number.clone();
    let bytes = render_pdf(move || {
        pdf::build_invoice(
            &company,
            &customer,
            &items,
            &number_for_build,
            due_days,
            notes.as_deref(),
            Some(&logo),
        )
    })
    .await?;
    Ok((bytes, number))
}

pub async fn quote_pdf(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Result<Response, ApiError> {
    require_items(&req.items)?;
    let (bytes, number) = build_quote(&state, req).await?;
    Ok(pdf_response(bytes, &format!("Quote_{}.pdf", number)))
}

pub async fn quote_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_items(&req.items)?;
    let to = recipient(req.to.as_deref(), &req.customer.email)?;
    let customer_name = req.customer.name.clone();
    let totals = Totals::from_items(&req.items);

    let (bytes, number) = build_quote(&state, req).await?;

    let mut ctx = Context::new();
    ctx.insert("customer_name", &customer_name);
    ctx.insert("number", &number);
    ctx.insert("company_name", &state.config.company.name);
    ctx.insert("once_off_total", &format_rands(totals.once_off_total_cents()));
    ctx.insert("monthly_total", &format_rands(totals.monthly_total_cents()));
    let html = templates::render("quote_email.html", &ctx)?;

    state
        .mailer
        .send(
            &[to],
            &format!("Quotation {} from {}", number, state.config.company.name),
            &html,
            &[Attachment {
                filename: format!("Quote_{}.pdf", number),
                content: bytes,
            }],
        )
        .await?;

    Ok(Json(serde_json::json!({ "ok": true, "number": number })))
}

pub async fn invoice_pdf(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InvoiceRequest>,
) -> Result<Response, ApiError> {
    require_items(&req.items)?;
    let (bytes, number) = build_invoice(&state, req).await?;
    Ok(pdf_response(bytes, &format!("Invoice_{}.pdf", number)))
}

pub async fn invoice_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InvoiceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_items(&req.items)?;
    let to = recipient(req.to.as_deref(), &req.customer.email)?;
    let customer_name = req.customer.name.clone();
    let totals = Totals::from_items(&req.items);

    let (bytes, number) = build_invoice(&state, req).await?;

    let mut ctx = Context::new();
    ctx.insert("customer_name", &customer_name);
    ctx.insert("number", &number);
    ctx.insert("company_name", &state.config.company.name);
    ctx.insert("once_off_total", &format_rands(totals.once_off_total_cents()));
    ctx.insert("monthly_total", &format_rands(totals.monthly_total_cents()));
    let html = templates::render("invoice_email.html", &ctx)?;

    state
        .mailer
        .send(
            &[to],
            &format!("Invoice {} from {}", number, state.config.company.name),
            &html,
            &[Attachment {
                filename: format!("Invoice_{}.pdf", number),
                content: bytes,
            }],
        )
        .await?;

    Ok(Json(serde_json::json!({ "ok": true, "number": number })))
}

pub async fn sla_pdf(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SlaRequest>,
) -> Result<Response, ApiError> {
    let company = req.company.unwrap_or_else(|| state.config.company.clone());
    let start_date = req.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let logo = state.config.logo_path.clone();
    let customer = req.customer;
    let debit = req.debit_order;
    let order_id = req.order_id;

    let bytes = render_pdf(move || {
        pdf::build_sla(
            &company,
            &customer,
            order_id.as_deref(),
            start_date,
            &debit,
            Some(&logo),
        )
    })
    .await?;

    Ok(pdf_response(bytes, "Service_Level_Agreement.pdf"))
}
