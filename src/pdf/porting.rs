use chrono::Utc;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::Element;
use std::path::Path;

use crate::models::{Company, PortingRequest};
use crate::money::format_date;

use super::{
    detail_card, heading_style, label_style, letterhead, new_document, render_to_bytes,
    signature_table, small_style,
};

fn numbers_table(numbers: &[String]) -> TableLayout {
    let mut table = TableLayout::new(vec![1, 3]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    table
        .row()
        .element(Paragraph::new("#").styled(label_style()).padded(1))
        .element(
            Paragraph::new("Number to be ported")
                .styled(label_style())
                .padded(1),
        )
        .push()
        .expect("Invalid table row");
    for (i, number) in numbers.iter().enumerate() {
        table
            .row()
            .element(Paragraph::new((i + 1).to_string()).padded(1))
            .element(Paragraph::new(number).padded(1))
            .push()
            .expect("Invalid table row");
    }
    table
}

/// Letter of authority instructing the losing provider to release the listed
/// numbers.
pub fn build_porting_loa(
    company: &Company,
    porting: &PortingRequest,
    logo: Option<&Path>,
) -> Result<Vec<u8>, String> {
    let today = Utc::now().date_naive();

    let mut doc = new_document("Letter of Authority - Number Porting")?;
    letterhead(&mut doc, company, logo, "LETTER OF AUTHORITY");

    doc.push(
        Paragraph::default()
            .styled_string("Date: ", label_style())
            .string(format_date(today)),
    );
    doc.push(Break::new(1.0));

    doc.push(Paragraph::new(format!(
        "I, {}, being the account holder of the numbers listed below, hereby authorise \
         {} to act on my behalf and to port the listed numbers away from {} to the \
         network of their choosing.",
        porting.account_holder, company.name, porting.current_provider
    )));
    doc.push(Break::new(1.0));

    let mut rows = vec![("Account holder", porting.account_holder.clone())];
    if !porting.id_number.is_empty() {
        rows.push(("ID / registration no", porting.id_number.clone()));
    }
    rows.push(("Current provider", porting.current_provider.clone()));
    if !porting.provider_account_no.is_empty() {
        rows.push(("Provider account no", porting.provider_account_no.clone()));
    }
    if !porting.service_address.is_empty() {
        rows.push(("Service address", porting.service_address.join(", ")));
    }
    doc.push(detail_card("Account holder details", rows));
    doc.push(Break::new(1.0));

    doc.push(Paragraph::new("Numbers to be ported").styled(heading_style()));
    doc.push(Break::new(0.2));
    doc.push(numbers_table(&porting.numbers));
    doc.push(Break::new(1.0));

    doc.push(Paragraph::new(
        "I confirm that the account with the current provider is in good standing and that \
         I am duly authorised to request this port. I understand that number porting may \
         interrupt service on the listed numbers for a short period, that any bundles or \
         value-added services attached to the numbers with the current provider will lapse \
         on completion of the port, and that contractual obligations to the current \
         provider remain my responsibility.",
    ));
    doc.push(Break::new(0.5));
    doc.push(
        Paragraph::new(
            "A copy of the account holder's identity document or company registration must \
             accompany this letter.",
        )
        .styled(small_style()),
    );
    doc.push(Break::new(1.0));

    doc.push(signature_table("Account holder", "Witness"));

    render_to_bytes(doc)
}
