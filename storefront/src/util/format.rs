//! Display formatting for money, stock, and greetings.

/// Format integer cents as US dollars with thousands separators.
///
/// `129999` becomes `"$1,299.99"`, `-50` becomes `"-$0.50"`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = group_thousands(abs / 100);
    format!("{sign}${dollars}.{:02}", abs % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Stock band shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    OutOfStock,
    /// 1 to 10 left.
    Only(i64),
    /// 11 to 30 left.
    Low,
    Available,
}

impl Availability {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::OutOfStock => "Out of Stock".to_owned(),
            Self::Only(n) => format!("Only {n} in stock!"),
            Self::Low => "Low Availability".to_owned(),
            Self::Available => "Available".to_owned(),
        }
    }

    #[must_use]
    pub fn can_purchase(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

#[must_use]
pub fn availability(stock: i64) -> Availability {
    match stock {
        ..=0 => Availability::OutOfStock,
        1..=10 => Availability::Only(stock),
        11..=30 => Availability::Low,
        _ => Availability::Available,
    }
}

/// Local part of an email for greetings. An address with no `@`, or one
/// that starts with `@`, is returned whole.
#[must_use]
pub fn username_from_email(email: &str) -> &str {
    match email.find('@') {
        Some(at) if at > 0 => &email[..at],
        _ => email,
    }
}

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;
