use chrono::NaiveDate;

use crate::engine::entry::{ACC_PRODUCT, RepresentativeEntry};

/// Long US-style date used as the summary header, e.g. "January 5, 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Render the end-of-day summary for the given entries.
///
/// Entries without a rep code or without any positive quantity are skipped.
/// Each remaining entry becomes one `CODE: qty name, ...` line followed by a
/// blank line; standard products come before custom ones.
pub fn render_summary<'a, I>(entries: I, today: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a RepresentativeEntry>,
{
    let mut summary = format!("{}\n\n", format_long_date(today));

    for entry in entries {
        if let Some(line) = summary_line(entry) {
            summary.push_str(&line);
            summary.push_str("\n\n");
        }
    }

    summary.trim_end().to_string()
}

fn summary_line(entry: &RepresentativeEntry) -> Option<String> {
    if entry.rep_code.is_empty() || !entry.has_sales() {
        return None;
    }

    let items: Vec<String> = entry
        .products
        .positive()
        .chain(entry.custom_products.positive())
        .map(|(name, qty)| format_item(name, qty, &entry.acc_profit))
        .collect();

    Some(format!(
        "{}: {}",
        entry.rep_code.to_uppercase(),
        items.join(", ")
    ))
}

fn format_item(name: &str, qty: u32, acc_profit: &str) -> String {
    if name == ACC_PRODUCT && !acc_profit.is_empty() {
        format!("{qty} {ACC_PRODUCT} ${acc_profit}")
    } else {
        format!("{qty} {name}")
    }
}
