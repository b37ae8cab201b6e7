use chrono::{Duration, Utc};
use genpdf::elements::{Break, Paragraph};
use genpdf::Element;
use std::path::Path;

use crate::bundles;
use crate::models::{Company, Customer, LineItem, Totals};
use crate::money::format_date;

use super::{
    company_lines, customer_lines, detail_card, items_table, label_style, letterhead,
    new_document, parties_table, render_to_bytes, small_style, totals_table,
};

/// Quotation: items, totals, validity window, optional notes.
pub fn build_quote(
    company: &Company,
    customer: &Customer,
    items: &[LineItem],
    number: &str,
    valid_days: u32,
    notes: Option<&str>,
    logo: Option<&Path>,
) -> Result<Vec<u8>, String> {
    let today = Utc::now().date_naive();
    let valid_until = today + Duration::days(i64::from(valid_days));

    let mut doc = new_document(&format!("Quotation {}", number))?;
    letterhead(&mut doc, company, logo, "QUOTATION");

    doc.push(
        Paragraph::default()
            .styled_string("Quote no: ", label_style())
            .string(number),
    );
    doc.push(
        Paragraph::default()
            .styled_string("Date: ", label_style())
            .string(format_date(today)),
    );
    doc.push(
        Paragraph::default()
            .styled_string("Valid until: ", label_style())
            .string(format_date(valid_until)),
    );
    doc.push(Break::new(1.0));

    doc.push(parties_table(
        "From",
        company_lines(company),
        "For",
        customer_lines(customer),
    ));
    doc.push(Break::new(1.0));

    doc.push(items_table(items));
    doc.push(Break::new(0.5));
    doc.push(totals_table(&Totals::from_items(items)));

    let minutes = bundles::total_minutes(items);
    if minutes > 0 {
        doc.push(Break::new(0.5));
        doc.push(Paragraph::new(format!(
            "This order includes {} bundled anytime minutes per month.",
            minutes
        )));
    }

    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        doc.push(Break::new(1.0));
        doc.push(Paragraph::new("Notes").styled(label_style()));
        doc.push(Paragraph::new(notes));
    }

    doc.push(Break::new(1.0));
    doc.push(
        Paragraph::new(format!(
            "This quotation is valid until {}. Prices exclude VAT unless stated otherwise. E&OE.",
            format_date(valid_until)
        ))
        .styled(small_style()),
    );

    render_to_bytes(doc)
}

/// Tax invoice: items, totals, due date, banking details with the payment
/// reference.
pub fn build_invoice(
    company: &Company,
    customer: &Customer,
    items: &[LineItem],
    number: &str,
    due_days: u32,
    notes: Option<&str>,
    logo: Option<&Path>,
) -> Result<Vec<u8>, String> {
    let today = Utc::now().date_naive();
    let due_date = today + Duration::days(i64::from(due_days));

    let mut doc = new_document(&format!("Tax Invoice {}", number))?;
    letterhead(&mut doc, company, logo, "TAX INVOICE");

    doc.push(
        Paragraph::default()
            .styled_string("Invoice no: ", label_style())
            .string(number),
    );
    doc.push(
        Paragraph::default()
            .styled_string("Date: ", label_style())
            .string(format_date(today)),
    );
    doc.push(
        Paragraph::default()
            .styled_string("Due by: ", label_style())
            .string(format_date(due_date)),
    );
    doc.push(Break::new(1.0));

    doc.push(parties_table(
        "From",
        company_lines(company),
        "Invoice to",
        customer_lines(customer),
    ));
    doc.push(Break::new(1.0));

    doc.push(items_table(items));
    doc.push(Break::new(0.5));
    doc.push(totals_table(&Totals::from_items(items)));
    doc.push(Break::new(1.0));

    if let Some(banking) = &company.banking {
        doc.push(detail_card(
            "Payment details",
            vec![
                ("Bank", banking.bank.clone()),
                ("Account no", banking.account_no.clone()),
                ("Branch code", banking.branch_code.clone()),
                ("Reference", number.to_string()),
            ],
        ));
    }

    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        doc.push(Break::new(1.0));
        doc.push(Paragraph::new("Notes").styled(label_style()));
        doc.push(Paragraph::new(notes));
    }

    doc.push(Break::new(1.0));
    doc.push(
        Paragraph::new(format!(
            "Payment is due by {}. Please use the invoice number as your payment reference.",
            format_date(due_date)
        ))
        .styled(small_style()),
    );

    render_to_bytes(doc)
}
