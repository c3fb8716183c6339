//! Numeric text handling: digit extraction, clamping, step snapping, display formatting.
//!
//! Every function here is total. Malformed input degrades to "unset" (`None`)
//! or to a clamped value; nothing panics and nothing returns an error.

/// Keep only ASCII digits. Signs, decimal points and separators are dropped.
pub fn parse_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics; a NaN value collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Round `value` to the nearest multiple of `step` measured from `min`, then clamp.
///
/// Ties go to the even multiple. A non-positive or non-finite step disables
/// rounding and only clamps.
pub fn snap(value: f64, step: f64, min: f64, max: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return clamp(value, min, max);
    }
    let snapped = ((value - min) / step).round_ties_even() * step + min;
    clamp(snapped, min, max)
}

/// Parse field text into a domain value.
///
/// Blank or non-numeric text is `None` ("unset"). Anything numeric is
/// clamped into `[min, max]` and then snapped to the step grid. A digit run
/// too long for `f64` overflows to infinity and clamps like any other
/// out-of-range number; spelled-out `inf`/`NaN` count as non-numeric.
pub fn to_number_or_null(text: &str, min: f64, max: f64, step: f64) -> Option<f64> {
    let trimmed = text.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: f64 = trimmed.parse().ok()?;
    if n.is_nan() {
        return None;
    }
    Some(snap(clamp(n, min, max), step, min, max))
}

/// Insert `,` every three digits from the right.
///
/// Purely cosmetic: the digits themselves (leading zeros included) are kept,
/// so `parse_digits` recovers the input exactly. Text that is not a plain digit
/// string is returned unchanged.
pub fn format_with_thousands_separator(text: &str) -> String {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }
    let len = text.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain string form of a value, as written back into a text field.
///
/// Whole numbers print without a fractional part (`1000`, not `1000.0`).
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Display form of a value with thousands separators (`1234567` → `1,234,567`).
pub fn format_amount(value: f64) -> String {
    let plain = format_value(value);
    match plain.strip_prefix('-') {
        Some(digits) => format!("-{}", format_with_thousands_separator(digits)),
        None => format_with_thousands_separator(&plain),
    }
}
