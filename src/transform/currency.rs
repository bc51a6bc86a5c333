//! Rupee formatting with Indian digit grouping (`₹12,34,567.89`).
//!
//! Rounding is half-up on the shortest decimal form of the `f64`, so
//! `1234.565` rounds to `1234.57` even though its binary value sits a hair
//! below the midpoint.

/// Round to 2 decimals and render as a quoted rupee amount, e.g. `"₹1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    format!("\"{}\"", format_inr(amount))
}

/// Round to 2 decimals and render as rupees, unquoted.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("₹{}", amount);
    }

    let (rupees, paise) = round_to_paise(amount.abs());
    let zero = rupees == "0" && paise == "00";
    let sign = if amount.is_sign_negative() && !zero { "-" } else { "" };
    format!("{sign}₹{}.{paise}", group_indian(&rupees))
}

/// Split a non-negative amount into whole-rupee digits and two paise digits,
/// rounding half-up on its decimal representation.
fn round_to_paise(amount: f64) -> (String, String) {
    // f64 Display never switches to exponent notation.
    let repr = amount.to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((&repr, ""));

    let mut digits: Vec<u8> = whole.bytes().map(|b| b - b'0').collect();
    let mut fraction_digits = fraction.bytes().map(|b| b - b'0');
    digits.push(fraction_digits.next().unwrap_or(0));
    digits.push(fraction_digits.next().unwrap_or(0));

    if fraction_digits.next().is_some_and(|d| d >= 5) {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let split = digits.len() - 2;
    let rupees = render(&digits[..split]);
    let rupees = match rupees.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    };
    (rupees, render(&digits[split..]))
}

/// Group digits the Indian way: the last three together, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
