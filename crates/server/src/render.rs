//! User-facing messages for prediction outcomes.

use crate::outcome::PredictionOutcome;

/// Format dollars with thousands separators and two decimals,
/// e.g. `$1,234,567.89`. Negative amounts render as `$-12.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }

    let digits = format!("{:.2}", amount.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // No sign when the amount rounds to zero cents
    let sign = if amount < 0.0 && digits != "0.00" { "-" } else { "" };
    format!("${sign}{grouped}.{fraction}")
}

/// The line shown to the user after pressing "predict"
pub fn render(outcome: &PredictionOutcome) -> String {
    match outcome {
        PredictionOutcome::Success(result) => {
            format!("Predicted Box Office Revenue: {}", format_currency(result.revenue))
        }
        PredictionOutcome::Failure(failure) => {
            format!("Error: {} - Please check your inputs!", failure.message)
        }
    }
}
