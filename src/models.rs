use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bundles;
use crate::money::vat_cents;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub registration_no: String,
    #[serde(default)]
    pub vat_no: String,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub banking: Option<BankingDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingDetails {
    pub bank: String,
    pub account_no: String,
    pub branch_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(default)]
    pub vat_no: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Billing {
    OnceOff,
    Monthly,
}

fn default_qty() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default = "default_qty")]
    pub qty: u32,
    pub unit_price_cents: i64,
    pub billing: Billing,
    /// Included voice minutes; inferred from the name when absent.
    #[serde(default)]
    pub minutes: Option<u32>,
}

impl LineItem {
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.qty)
    }

    pub fn included_minutes(&self) -> Option<u32> {
        self.minutes.or_else(|| bundles::infer_minutes(&self.name))
    }
}

/// Once-off and monthly subtotals, VAT-exclusive. Always derived from the
/// items, never accepted off the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub once_off_cents: i64,
    pub monthly_cents: i64,
}

impl Totals {
    pub fn from_items(items: &[LineItem]) -> Self {
        let mut once_off_cents = 0;
        let mut monthly_cents = 0;
        for item in items {
            match item.billing {
                Billing::OnceOff => once_off_cents += item.total_cents(),
                Billing::Monthly => monthly_cents += item.total_cents(),
            }
        }
        Self {
            once_off_cents,
            monthly_cents,
        }
    }

    pub fn once_off_vat_cents(&self) -> i64 {
        vat_cents(self.once_off_cents)
    }

    pub fn monthly_vat_cents(&self) -> i64 {
        vat_cents(self.monthly_cents)
    }

    pub fn once_off_total_cents(&self) -> i64 {
        self.once_off_cents + self.once_off_vat_cents()
    }

    pub fn monthly_total_cents(&self) -> i64 {
        self.monthly_cents + self.monthly_vat_cents()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitOrder {
    pub account_holder: String,
    pub bank: String,
    pub account_no: String,
    pub branch_code: String,
    #[serde(default = "default_account_type")]
    pub account_type: String,
    #[serde(default = "default_collection_day")]
    pub collection_day: u8,
}

fn default_account_type() -> String {
    "Cheque".to_string()
}

fn default_collection_day() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortingRequest {
    pub account_holder: String,
    #[serde(default)]
    pub id_number: String,
    pub current_provider: String,
    #[serde(default)]
    pub provider_account_no: String,
    pub numbers: Vec<String>,
    #[serde(default)]
    pub service_address: Vec<String>,
    #[serde(default)]
    pub email: String,
}

/// Written once to `orders/{id}/meta.json`; never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMeta {
    pub order_id: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub created_at: DateTime<Utc>,
}

/// Written once to `orders/{id}/links.json`; read back by the links/archive
/// handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocLinks {
    pub quote: String,
    pub invoice: String,
    pub sla: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub porting: Option<String>,
    pub meta: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub company: Option<Company>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub valid_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Overrides the customer email for the /email variant.
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[serde(default)]
    pub company: Option<Company>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub due_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaRequest {
    #[serde(default)]
    pub company: Option<Company>,
    pub customer: Customer,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<chrono::NaiveDate>,
    pub debit_order: DebitOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocumentsRequest {
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub debit_order: DebitOrder,
    #[serde(default)]
    pub porting: Option<PortingRequest>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Email the customer a links summary after upload (default on).
    #[serde(default = "default_notify")]
    pub notify: bool,
}

fn default_notify() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem {
                name: "Yealink T31P Handset".to_string(),
                qty: 3,
                unit_price_cents: 89_900,
                billing: Billing::OnceOff,
                minutes: None,
            },
            LineItem {
                name: "Cloud PBX Extension".to_string(),
                qty: 3,
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
    fn totals_split_by_billing_kind() {
        let totals = Totals::from_items(&items());
        assert_eq!(totals.once_off_cents, 269_700);
        assert_eq!(totals.monthly_cents, 44_500);
    }

    #[test]
    fn totals_include_vat() {
        let totals = Totals::from_items(&items());
        assert_eq!(totals.once_off_vat_cents(), 40_455);
        assert_eq!(totals.once_off_total_cents(), 310_155);
        assert_eq!(totals.monthly_vat_cents(), 6_675);
        assert_eq!(totals.monthly_total_cents(), 51_175);
    }

    #[test]
    fn line_items_use_camel_case_wire_names() {
        let item: LineItem = serde_json::from_str(
            r#"{"name":"Capped 500 Minute Bundle","unitPriceCents":25000,"billing":"monthly"}"#,
        )
        .unwrap();
        assert_eq!(item.qty, 1);
        assert_eq!(item.billing, Billing::Monthly);
        assert_eq!(item.included_minutes(), Some(500));
    }

    #[test]
    fn links_omit_absent_porting_document() {
        let links = DocLinks {
            quote: "q".to_string(),
            invoice: "i".to_string(),
            sla: "s".to_string(),
            porting: None,
            meta: "m".to_string(),
        };
        let json = serde_json::to_string(&links).unwrap();
        assert!(!json.contains("porting"));
    }
}
