/// `credit_score` -> `Credit Score`. Letters following a non-letter are upper-cased,
/// the rest lower-cased.
pub fn humanize_factor(name: &str) -> String {
    let mut humanized = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if previous_is_letter {
                humanized.extend(ch.to_lowercase());
            } else {
                humanized.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            humanized.push(ch);
            previous_is_letter = false;
        }
    }
    humanized
}

/// Format a value already expressed in percentage points, e.g. `13.0%`.
pub fn percent(points: f64) -> String {
    format!("{points:.1}%")
}

/// Format a fraction in [0, 1] as a percentage, e.g. `0.725` -> `72.5%`.
pub fn fraction_as_percent(fraction: f64) -> String {
    percent(fraction * 100.0)
}

/// Dollar amount with thousands separators and cents, e.g. `$85,000.00`.
pub fn currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}
