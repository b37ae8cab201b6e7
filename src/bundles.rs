use regex::Regex;
use std::sync::OnceLock;

use crate::models::LineItem;

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d[\d\s]{0,6})\s*(?:anytime\s+)?min(?:ute)?s?\b")
            .expect("minutes regex is valid")
    })
}

/// Infer an included-minutes count from a free-text item name, e.g.
/// "Capped 500 Minute Bundle" -> 500. Names without a number ("Unlimited
/// Minutes") yield nothing.
pub fn infer_minutes(name: &str) -> Option<u32> {
    let caps = minutes_re().captures(name)?;
    let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|&n| n > 0)
}

/// Total included minutes across a set of line items. An explicit `minutes`
/// field on an item always wins over name inference; quantity multiplies.
pub fn total_minutes(items: &[LineItem]) -> u32 {
    items
        .iter()
        .map(|item| item.included_minutes().unwrap_or(0) * item.qty)
        .sum()
}
