use chrono::NaiveDate;

pub const VAT_RATE_PERCENT: i64 = 15;

/// Amounts are carried as integer cents everywhere; formatting happens only at
/// the PDF/email boundary. South African convention: "R 1 234,56".
pub fn format_rands(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let rands = (cents / 100).to_string();
    let mut grouped = String::with_capacity(rands.len() + rands.len() / 3);
    for (i, digit) in rands.chars().enumerate() {
        if i > 0 && (rands.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    format!("{}R {},{:02}", sign, grouped, cents % 100)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// VAT on a cent amount, rounded half-up.
pub fn vat_cents(subtotal_cents: i64) -> i64 {
    (subtotal_cents * VAT_RATE_PERCENT + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rands_with_grouping() {
        assert_eq!(format_rands(0), "R 0,00");
        assert_eq!(format_rands(950), "R 9,50");
        assert_eq!(format_rands(123_456), "R 1 234,56");
        assert_eq!(format_rands(1_234_567_89), "R 1 234 567,89");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_rands(-1200), "-R 12,00");
    }

    #[test]
    fn vat_rounds_half_up() {
        assert_eq!(vat_cents(10_000), 1_500);
        // 15% of 103 cents is 15.45 -> 15
        assert_eq!(vat_cents(103), 15);
        // 15% of 110 cents is 16.5 -> 17
        assert_eq!(vat_cents(110), 17);
    }

    #[test]
    fn formats_long_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(format_date(date), "08 August 2026");
    }
}
