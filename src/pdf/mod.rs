// Document builders for the back office: quotation, tax invoice, SLA and
// porting letter of authority.
// Uses genpdf - requires Liberation or similar fonts in standard paths
mod billing;
mod porting;
mod sla;

pub use billing::{build_invoice, build_quote};
pub use porting::build_porting_loa;
pub use sla::build_sla;

use genpdf::elements::{Break, FrameCellDecorator, Image, LinearLayout, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, SimplePageDecorator};
use std::path::Path;

use crate::models::{Company, Customer, LineItem, Totals};
use crate::money::{format_rands, VAT_RATE_PERCENT};

// Try common font paths - genpdf needs actual font files for metrics
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/TTF",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];
const FONT_NAMES: &[&str] = &["LiberationSans", "DejaVuSans", "Arial"];

pub fn load_fonts() -> Result<FontFamily<FontData>, String> {
    FONT_DIRS
        .iter()
        .find(|dir| Path::new(dir).exists())
        .and_then(|dir| {
            FONT_NAMES
                .iter()
                .find_map(|name| genpdf::fonts::from_files(*dir, name, None).ok())
        })
        .ok_or_else(|| "No suitable fonts found. Install: apt install fonts-liberation".to_string())
}

pub fn fonts_available() -> bool {
    load_fonts().is_ok()
}

fn new_document(title: &str) -> Result<Document, String> {
    let mut doc = Document::new(load_fonts()?);
    doc.set_title(title);
    doc.set_font_size(10);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn render_to_bytes(doc: Document) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    doc.render(&mut buf).map_err(|e| e.to_string())?;
    Ok(buf)
}

fn title_style() -> Style {
    Style::new().with_font_size(20).bold()
}

fn heading_style() -> Style {
    Style::new().with_font_size(13).bold()
}

fn label_style() -> Style {
    Style::new().bold()
}

fn small_style() -> Style {
    Style::new().with_font_size(8).with_color(Color::Rgb(90, 90, 90))
}

/// Logo (when the file is present and decodes) or the company name, the
/// document title, and a one-line contact strip.
fn letterhead(doc: &mut Document, company: &Company, logo: Option<&Path>, doc_title: &str) {
    let mut logo_drawn = false;
    if let Some(path) = logo.filter(|p| p.exists()) {
        match Image::from_path(path) {
            Ok(image) => {
                doc.push(image.with_alignment(Alignment::Left));
                logo_drawn = true;
            }
            Err(e) => tracing::warn!("Skipping logo {}: {}", path.display(), e),
        }
    }
    if !logo_drawn {
        doc.push(Paragraph::new(&company.name).styled(title_style()));
    }

    doc.push(
        Paragraph::new(doc_title)
            .aligned(Alignment::Right)
            .styled(heading_style()),
    );

    let mut contact = Vec::new();
    if !company.registration_no.is_empty() {
        contact.push(format!("Reg {}", company.registration_no));
    }
    if !company.vat_no.is_empty() {
        contact.push(format!("VAT {}", company.vat_no));
    }
    if !company.phone.is_empty() {
        contact.push(company.phone.clone());
    }
    if !company.email.is_empty() {
        contact.push(company.email.clone());
    }
    doc.push(Paragraph::new(contact.join("  ·  ")).styled(small_style()));
    doc.push(Break::new(1.0));
}

fn company_lines(company: &Company) -> Vec<String> {
    let mut lines = vec![company.name.clone()];
    lines.extend(company.address.iter().cloned());
    if !company.vat_no.is_empty() {
        lines.push(format!("VAT no: {}", company.vat_no));
    }
    lines
}

fn customer_lines(customer: &Customer) -> Vec<String> {
    let mut lines = vec![customer.name.clone()];
    if !customer.contact.is_empty() {
        lines.push(format!("Attn: {}", customer.contact));
    }
    lines.extend(customer.address.iter().cloned());
    if !customer.email.is_empty() {
        lines.push(customer.email.clone());
    }
    if !customer.phone.is_empty() {
        lines.push(customer.phone.clone());
    }
    if !customer.vat_no.is_empty() {
        lines.push(format!("VAT no: {}", customer.vat_no));
    }
    lines
}

fn party_block(title: &str, lines: Vec<String>) -> LinearLayout {
    let mut block = LinearLayout::vertical();
    block.push(Paragraph::new(title).styled(label_style()));
    for line in lines {
        block.push(Paragraph::new(line));
    }
    block
}

fn parties_table(
    left_title: &str,
    left_lines: Vec<String>,
    right_title: &str,
    right_lines: Vec<String>,
) -> TableLayout {
    let mut table = TableLayout::new(vec![1, 1]);
    table
        .row()
        .element(party_block(left_title, left_lines).padded(1))
        .element(party_block(right_title, right_lines).padded(1))
        .push()
        .expect("Invalid parties row");
    table
}

fn items_table(items: &[LineItem]) -> TableLayout {
    let mut table = TableLayout::new(vec![6, 1, 2, 2]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    table
        .row()
        .element(Paragraph::new("Description").styled(label_style()).padded(1))
        .element(
            Paragraph::new("Qty")
                .aligned(Alignment::Center)
                .styled(label_style())
                .padded(1),
        )
        .element(
            Paragraph::new("Unit price")
                .aligned(Alignment::Right)
                .styled(label_style())
                .padded(1),
        )
        .element(
            Paragraph::new("Amount")
                .aligned(Alignment::Right)
                .styled(label_style())
                .padded(1),
        )
        .push()
        .expect("Invalid table row");

    for item in items {
        let mut description = LinearLayout::vertical();
        description.push(Paragraph::new(&item.name));
        if let Some(minutes) = item.included_minutes() {
            description.push(
                Paragraph::new(format!("includes {} anytime minutes", minutes))
                    .styled(small_style()),
            );
        }
        if item.billing == crate::models::Billing::Monthly {
            description.push(Paragraph::new("billed monthly").styled(small_style()));
        }

        table
            .row()
            .element(description.padded(1))
            .element(
                Paragraph::new(item.qty.to_string())
                    .aligned(Alignment::Center)
                    .padded(1),
            )
            .element(
                Paragraph::new(format_rands(item.unit_price_cents))
                    .aligned(Alignment::Right)
                    .padded(1),
            )
            .element(
                Paragraph::new(format_rands(item.total_cents()))
                    .aligned(Alignment::Right)
                    .padded(1),
            )
            .push()
            .expect("Invalid table row");
    }
    table
}

fn totals_row(table: &mut TableLayout, label: &str, cents: i64, strong: bool) {
    let style = if strong { label_style() } else { Style::new() };
    table
        .row()
        .element(
            Paragraph::new(label)
                .aligned(Alignment::Right)
                .styled(style.clone()),
        )
        .element(
            Paragraph::new(format_rands(cents))
                .aligned(Alignment::Right)
                .styled(style),
        )
        .push()
        .expect("Invalid totals row");
}

fn totals_table(totals: &Totals) -> TableLayout {
    let mut table = TableLayout::new(vec![3, 1]);
    let vat_label = format!("VAT ({}%)", VAT_RATE_PERCENT);
    if totals.once_off_cents > 0 {
        totals_row(&mut table, "Once-off subtotal (excl. VAT)", totals.once_off_cents, false);
        totals_row(&mut table, &vat_label, totals.once_off_vat_cents(), false);
        totals_row(&mut table, "Once-off total", totals.once_off_total_cents(), true);
    }
    if totals.monthly_cents > 0 {
        totals_row(&mut table, "Monthly subtotal (excl. VAT)", totals.monthly_cents, false);
        totals_row(&mut table, &vat_label, totals.monthly_vat_cents(), false);
        totals_row(&mut table, "Monthly total", totals.monthly_total_cents(), true);
    }
    if totals.once_off_cents == 0 && totals.monthly_cents == 0 {
        totals_row(&mut table, "Total", 0, true);
    }
    table
}

fn detail_card(title: &str, rows: Vec<(&str, String)>) -> impl Element {
    let mut card = LinearLayout::vertical();
    card.push(Paragraph::new(title).styled(heading_style()));
    card.push(Break::new(0.2));

    let mut table = TableLayout::new(vec![1, 2]);
    for (label, value) in rows {
        table
            .row()
            .element(Paragraph::new(label).styled(label_style()).padded(1))
            .element(Paragraph::new(value).padded(1))
            .push()
            .expect("Invalid card row");
    }
    card.push(table);
    card.padded(2).framed()
}

fn signature_cell(label: &str) -> impl Element {
    let mut cell = LinearLayout::vertical();
    cell.push(Break::new(2.0));
    cell.push(Paragraph::new("_______________________________"));
    cell.push(Paragraph::new(label).styled(small_style()));
    cell.push(Break::new(0.5));
    cell.push(Paragraph::new("Date: _______________________").styled(small_style()));
    cell.padded(2)
}

fn signature_table(left_label: &str, right_label: &str) -> TableLayout {
    let mut table = TableLayout::new(vec![1, 1]);
    table
        .row()
        .element(signature_cell(left_label))
        .element(signature_cell(right_label))
        .push()
        .expect("Invalid signature row");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Billing, DebitOrder, PortingRequest};

    fn company() -> Company {
        Company {
            name: "Switchdesk Communications (Pty) Ltd".to_string(),
            registration_no: "2019/384021/07".to_string(),
            vat_no: "4820291835".to_string(),
            address: vec!["Unit 4, Waterfall Park".to_string(), "Midrand 1685".to_string()],
            phone: "+27 10 023 4400".to_string(),
            email: "accounts@switchdesk.co.za".to_string(),
            banking: Some(crate::models::BankingDetails {
                bank: "First National Bank".to_string(),
                account_no: "62841077301".to_string(),
                branch_code: "250655".to_string(),
            }),
        }
    }

    fn customer() -> Customer {
        Customer {
            name: "Mokoena Attorneys".to_string(),
            contact: "T Mokoena".to_string(),
            email: "admin@mokoena.law".to_string(),
            phone: "+27 11 447 2210".to_string(),
            address: vec!["12 Jan Smuts Ave".to_string(), "Rosebank 2196".to_string()],
            vat_no: String::new(),
        }
    }

    fn items() -> Vec<LineItem> {
        vec![
            LineItem {
                name: "Yealink T31P Handset".to_string(),
                qty: 4,
                unit_price_cents: 89_900,
                billing: Billing::OnceOff,
                minutes: None,
            },
            LineItem {
                name: "Cloud PBX Extension".to_string(),
                qty: 4,
                unit_price_cents: 6_500,
                billing: Billing::Monthly,
                minutes: None,
            },
            LineItem {
                name: "Capped 500 Minute Bundle".to_string(),
                qty: 1,
                unit_price_cents: 25_000,
                billing: Billing::Monthly,
                minutes: None,
            },
        ]
    }

    #[test]
    fn quote_renders_well_formed_pdf() {
        if !fonts_available() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let bytes = build_quote(
            &company(),
            &customer(),
            &items(),
            "Q-20260808-ab12cd34",
            14,
            Some("Installation within 5 business days of acceptance."),
            None,
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
    }

    #[test]
    fn invoice_renders_with_banking_card() {
        if !fonts_available() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let bytes = build_invoice(
            &company(),
            &customer(),
            &items(),
            "INV-20260808-ab12cd34",
            30,
            None,
            None,
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn sla_renders_well_formed_pdf() {
        if !fonts_available() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let debit = DebitOrder {
            account_holder: "Mokoena Attorneys".to_string(),
            bank: "Standard Bank".to_string(),
            account_no: "10094882210".to_string(),
            branch_code: "051001".to_string(),
            account_type: "Cheque".to_string(),
            collection_day: 1,
        };
        let start = chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let bytes = build_sla(
            &company(),
            &customer(),
            Some("ORD-2026-0142"),
            start,
            &debit,
            None,
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn porting_loa_renders_well_formed_pdf() {
        if !fonts_available() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let porting = PortingRequest {
            account_holder: "Mokoena Attorneys".to_string(),
            id_number: "7409125800087".to_string(),
            current_provider: "Vodacom Business".to_string(),
            provider_account_no: "VB-4471820".to_string(),
            numbers: vec!["+27 11 447 2210".to_string(), "+27 11 447 2211".to_string()],
            service_address: vec!["12 Jan Smuts Ave, Rosebank".to_string()],
            email: "admin@mokoena.law".to_string(),
        };
        let bytes = build_porting_loa(&company(), &porting, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn undecodable_logo_falls_back_to_company_name() {
        if !fonts_available() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"not actually a png").unwrap();

        let bytes = build_quote(
            &company(),
            &customer(),
            &items(),
            "Q-1",
            7,
            None,
            Some(&logo),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
