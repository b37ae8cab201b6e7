use chrono::NaiveDate;
use genpdf::elements::{Break, FrameCellDecorator, PageBreak, Paragraph, TableLayout};
use genpdf::{Alignment, Element};
use std::path::Path;

use crate::models::{Company, Customer, DebitOrder};
use crate::money::format_date;

use super::{
    company_lines, customer_lines, detail_card, heading_style, label_style, letterhead,
    new_document, parties_table, render_to_bytes, signature_table, small_style,
};

const SERVICE_LEVELS: &[(&str, &str)] = &[
    ("Service availability", "99.5% per calendar month"),
    ("Support hours", "Monday to Friday, 08:00 - 17:00 SAST"),
    ("P1 (service down) response", "Within 1 hour"),
    ("P2 (degraded service) response", "Within 4 hours"),
    ("P3 (general request) response", "Next business day"),
];

fn service_levels_table() -> TableLayout {
    let mut table = TableLayout::new(vec![1, 1]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    table
        .row()
        .element(Paragraph::new("Measure").styled(label_style()).padded(1))
        .element(Paragraph::new("Target").styled(label_style()).padded(1))
        .push()
        .expect("Invalid table row");
    for (measure, target) in SERVICE_LEVELS {
        table
            .row()
            .element(Paragraph::new(*measure).padded(1))
            .element(Paragraph::new(*target).padded(1))
            .push()
            .expect("Invalid table row");
    }
    table
}

/// Service level agreement with the debit order mandate on its own page.
pub fn build_sla(
    company: &Company,
    customer: &Customer,
    order_id: Option<&str>,
    start_date: NaiveDate,
    debit: &DebitOrder,
    logo: Option<&Path>,
) -> Result<Vec<u8>, String> {
    let mut doc = new_document("Service Level Agreement")?;
    letterhead(&mut doc, company, logo, "SERVICE LEVEL AGREEMENT");

    if let Some(order_id) = order_id {
        doc.push(
            Paragraph::default()
                .styled_string("Agreement reference: ", label_style())
                .string(order_id),
        );
    }
    doc.push(
        Paragraph::default()
            .styled_string("Effective from: ", label_style())
            .string(format_date(start_date)),
    );
    doc.push(Break::new(0.5));
    doc.push(
        Paragraph::new("entered into between")
            .aligned(Alignment::Center)
            .styled(small_style()),
    );
    doc.push(parties_table(
        "The provider",
        company_lines(company),
        "The customer",
        customer_lines(customer),
    ));
    doc.push(Break::new(1.0));

    doc.push(Paragraph::new("1. Service").styled(heading_style()));
    doc.push(Paragraph::new(
        "The provider supplies a hosted VoIP telephony service comprising cloud PBX \
         extensions, voice call routing, number hosting and the equipment listed in the \
         accompanying order, delivered over the customer's internet connectivity.",
    ));
    doc.push(Break::new(0.8));

    doc.push(Paragraph::new("2. Service levels").styled(heading_style()));
    doc.push(Break::new(0.2));
    doc.push(service_levels_table());
    doc.push(Break::new(0.2));
    doc.push(
        Paragraph::new(
            "Availability is measured at the provider's network edge and excludes planned \
             maintenance announced at least 48 hours in advance and faults on the customer's \
             own connectivity.",
        )
        .styled(small_style()),
    );
    doc.push(Break::new(0.8));

    doc.push(Paragraph::new("3. Term and billing").styled(heading_style()));
    doc.push(Paragraph::new(format!(
        "This agreement commences on {} and continues month to month until terminated on \
         one calendar month's written notice. Monthly charges are billed in advance and \
         collected by debit order on day {} of each month.",
        format_date(start_date),
        debit.collection_day
    )));

    doc.push(PageBreak::new());

    doc.push(Paragraph::new("4. Debit order mandate").styled(heading_style()));
    doc.push(Break::new(0.3));
    doc.push(detail_card(
        "Bank account details",
        vec![
            ("Account holder", debit.account_holder.clone()),
            ("Bank", debit.bank.clone()),
            ("Account no", debit.account_no.clone()),
            ("Branch code", debit.branch_code.clone()),
            ("Account type", debit.account_type.clone()),
            ("Collection day", format!("Day {} of each month", debit.collection_day)),
        ],
    ));
    doc.push(Break::new(0.5));
    doc.push(Paragraph::new(
        "I/we authorise the provider to draw against the account above for all amounts due \
         under this agreement. Collections falling on a non-business day may be processed on \
         the preceding business day. This mandate may be cancelled in writing on 30 days' \
         notice; cancellation does not cancel the underlying agreement.",
    ));
    doc.push(Break::new(1.0));

    doc.push(signature_table("For the provider", "For the customer"));

    render_to_bytes(doc)
}
