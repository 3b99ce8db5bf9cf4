//! Plain-text rendering of a generation result.

use super::model::{GenerateResponse, Outfit};
use crate::intake::prompts;

/// Colors shown in the palette line.
const PALETTE_PREVIEW: usize = 4;

/// Format a price the way nl-NL does: `€ 1.234,50`.
///
/// Codes that are not three ASCII letters fall back to `"{value} {code}"`.
pub fn format_price(value: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return format!("{value} {currency}");
    }
    let symbol = match code.as_str() {
        "EUR" => "€",
        "GBP" => "£",
        "USD" => "US$",
        other => other,
    };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{symbol} {sign}{}", dutch_amount(value.abs()))
}

/// Two decimals, `.` for thousands and `,` for the decimal separator.
fn dutch_amount(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }
    format!("{grouped},{frac_part}")
}

/// One outfit as a multi-line card.
pub fn render_outfit(outfit: &Outfit) -> String {
    let mut lines = vec![format!("── {} ──", outfit.name)];
    for item in &outfit.items {
        let mut meta = format_price(item.price, &item.currency);
        if let Some(merchant) = item.merchant.as_deref().filter(|m| !m.is_empty()) {
            meta.push_str(&format!(" • {merchant}"));
        }
        if let Some(link) = item.link.as_deref().filter(|l| !l.is_empty()) {
            meta.push_str(&format!(" · bekijk: {link}"));
        }
        lines.push(format!("  {} ({})", item.title, item.category));
        lines.push(format!("    {meta}"));
    }
    lines.push(format!(
        "  Totaal: {}",
        format_price(outfit.total, &outfit.currency)
    ));
    lines.join("\n")
}

/// The messages Anna posts for a result: one card per outfit, then the
/// explanation, the palette and the independence note.
pub fn render_outfits(response: &GenerateResponse) -> Vec<String> {
    let mut messages: Vec<String> = response.outfits.iter().map(render_outfit).collect();
    messages.push(format!("Waarom dit werkt: {}", response.explanation));
    let palette: Vec<&str> = response
        .palette
        .colors
        .iter()
        .take(PALETTE_PREVIEW)
        .map(String::as_str)
        .collect();
    messages.push(format!("Palet: {}.", palette.join(", ")));
    messages.push(prompts::INDEPENDENT_NOTE.to_string());
    messages
}
