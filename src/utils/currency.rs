use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const FRACTION_DIGITS: u32 = 2;

// Decimal 上限約 7.9e28；超過此值的 f64 一定是整數
const DECIMAL_LIMIT: f64 = 1e28;

/// 以 tr-TR 慣例格式化土耳其里拉金額，例如 `2500000.0` -> `₺2.500.000,00`
pub fn format_try(amount: f64) -> String {
    if amount.is_nan() {
        return "₺NaN".to_string();
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();

    if abs.is_infinite() {
        return format!("{}₺∞", sign);
    }

    let (whole, fraction) = rounded_parts(abs);
    format!("{}₺{},{}", sign, group_thousands(&whole), fraction)
}

/// Integer and two-digit fraction of `abs`, rounded half away from zero.
///
/// Starts from the shortest round-trip decimal text of the f64, so `1e21`
/// keeps its digits instead of exposing binary noise.
fn rounded_parts(abs: f64) -> (String, String) {
    let text = abs.to_string();

    if abs >= DECIMAL_LIMIT {
        return (text, "00".to_string());
    }

    // 小數位數超出 Decimal 精度時，值必定小於 0.005
    let mut rounded = Decimal::from_str(&text)
        .map(|d| d.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO);
    rounded.rescale(FRACTION_DIGITS);

    let rounded = rounded.to_string();
    match rounded.split_once('.') {
        Some((whole, fraction)) => (whole.to_string(), fraction.to_string()),
        None => (rounded, "00".to_string()),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
