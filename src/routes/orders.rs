use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use tera::Context;

use crate::blob::{self, doc_filename, order_path};
use crate::error::ApiError;
use crate::models::{DocLinks, OrderDocumentsRequest, OrderMeta, Totals};
use crate::pdf;
use crate::state::AppState;
use crate::templates;

use super::{render_pdf, require_items};

/// Build every document for an order, persist the lot, and optionally mail
/// the customer a links summary. One failed build or upload fails the whole
/// request; nothing written so far is compensated for.
pub async fn generate_order_documents(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    Json(req): Json<OrderDocumentsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order_id = blob::sanitize_order_id(&order_id)?.to_string();
    require_items(&req.items)?;

    let company = state.config.company.clone();
    let logo = state.config.logo_path.clone();
    let totals = Totals::from_items(&req.items);
    let quote_no = format!("Q-{}", order_id);
    let invoice_no = format!("INV-{}", order_id);

    let (quote, invoice, sla) = {
        let (company_q, customer_q, items_q, logo_q, notes_q) = (
            company.clone(),
            req.customer.clone(),
            req.items.clone(),
            logo.clone(),
            req.notes.clone(),
        );
        let (company_i, customer_i, items_i, logo_i) = (
            company.clone(),
            req.customer.clone(),
            req.items.clone(),
            logo.clone(),
        );
        let (company_s, customer_s, debit_s, order_id_s, logo_s) = (
            company.clone(),
            req.customer.clone(),
            req.debit_order.clone(),
            order_id.clone(),
            logo.clone(),
        );
        tokio::try_join!(
            render_pdf(move || {
                pdf::build_quote(
                    &company_q,
                    &customer_q,
                    &items_q,
                    &quote_no,
                    14,
                    notes_q.as_deref(),
                    Some(&logo_q),
                )
            }),
            render_pdf(move || {
                pdf::build_invoice(
                    &company_i,
                    &customer_i,
                    &items_i,
                    &invoice_no,
                    30,
                    None,
                    Some(&logo_i),
                )
            }),
            render_pdf(move || {
                let start = Utc::now().date_naive();
                pdf::build_sla(
                    &company_s,
                    &customer_s,
                    Some(&order_id_s),
                    start,
                    &debit_s,
                    Some(&logo_s),
                )
            }),
        )?
    };

    let loa = match req.porting.clone() {
        Some(porting) => {
            let (company_p, logo_p) = (company.clone(), logo.clone());
            Some(
                render_pdf(move || pdf::build_porting_loa(&company_p, &porting, Some(&logo_p)))
                    .await?,
            )
        }
        None => None,
    };

    let meta = OrderMeta {
        order_id: order_id.clone(),
        customer: req.customer.clone(),
        items: req.items.clone(),
        totals,
        created_at: Utc::now(),
    };
    let meta_bytes = serde_json::to_vec_pretty(&meta)?;

    let quote_path = order_path(&order_id, &doc_filename("quote", &order_id));
    let invoice_path = order_path(&order_id, &doc_filename("invoice", &order_id));
    let sla_path = order_path(&order_id, &doc_filename("sla", &order_id));
    let meta_path = order_path(&order_id, "meta.json");

    let (quote_url, invoice_url, sla_url, meta_url) = tokio::try_join!(
        state.blob.put(&quote_path, quote, "application/pdf",),
        state.blob.put(&invoice_path, invoice, "application/pdf",),
        state.blob.put(&sla_path, sla, "application/pdf",),
        state
            .blob
            .put(&meta_path, meta_bytes, "application/json"),
    )?;

    let porting_url = match loa {
        Some(bytes) => Some(
            state
                .blob
                .put(
                    &order_path(&order_id, &doc_filename("porting", &order_id)),
                    bytes,
                    "application/pdf",
                )
                .await?,
        ),
        None => None,
    };

    let links = DocLinks {
        quote: quote_url,
        invoice: invoice_url,
        sla: sla_url,
        porting: porting_url,
        meta: meta_url,
    };
    state
        .blob
        .put(
            &order_path(&order_id, "links.json"),
            serde_json::to_vec_pretty(&links)?,
            "application/json",
        )
        .await?;

    if req.notify && !req.customer.email.trim().is_empty() {
        let mut ctx = Context::new();
        ctx.insert("customer_name", &req.customer.name);
        ctx.insert("order_id", &order_id);
        ctx.insert("links", &links);
        ctx.insert("company_name", &state.config.company.name);
        let html = templates::render("order_links.html", &ctx)?;

        state
            .mailer
            .send(
                &[req.customer.email.trim().to_string()],
                &format!("Your order documents ({})", order_id),
                &html,
                &[],
            )
            .await?;
    }

    Ok(Json(serde_json::json!({
        "ok": true,
        "orderId": order_id,
        "links": links,
    })))
}

pub async fn order_links(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<DocLinks>, ApiError> {
    let order_id = blob::sanitize_order_id(&order_id)?;
    let bytes = state.blob.get(&order_path(order_id, "links.json")).await?;
    let links: DocLinks = serde_json::from_slice(&bytes)?;
    Ok(Json(links))
}

pub async fn order_file(
    State(state): State<Arc<AppState>>,
    Path((order_id, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let order_id = blob::sanitize_order_id(&order_id)?;
    let filename = blob::sanitize_filename(&filename)?;

    let bytes = state.blob.get(&order_path(order_id, filename)).await?;
    let mime = mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Ok(Response::builder()
        .header("Content-Type", mime)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .unwrap())
}

pub async fn order_archive(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Response, ApiError> {
    let order_id = blob::sanitize_order_id(&order_id)?.to_string();
    let bytes = state.blob.get(&order_path(&order_id, "links.json")).await?;
    let links: DocLinks = serde_json::from_slice(&bytes)?;

    let mut names = vec![
        doc_filename("quote", &order_id),
        doc_filename("invoice", &order_id),
        doc_filename("sla", &order_id),
    ];
    if links.porting.is_some() {
        names.push(doc_filename("porting", &order_id));
    }
    names.push("meta.json".to_string());

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let content = state.blob.get(&order_path(&order_id, &name)).await?;
        files.push((name, content));
    }

    let mut zip_data = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_data));
        for (name, content) in files {
            let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&content)?;
        }
        zip.finish()?;
    }

    Ok(Response::builder()
        .header("Content-Type", "application/zip")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"Order_{}_documents.zip\"", order_id),
        )
        .body(Body::from(zip_data))
        .unwrap())
}
