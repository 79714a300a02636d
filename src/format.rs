// Display formatting for resolved metric values.
//
// Large counts are abbreviated with Indian units (K / Lakh / Cr). Thresholds
// are compared against the signed value, so negative numbers never
// abbreviate and fall through to plain grouped output.
use crate::fields::{CanonicalKey, Resolved, ResolvedField};
use crate::util::{group_indian, round_half_away, value_as_f64, value_text};

/// Shown for anything that resolved to nothing.
pub const PLACEHOLDER: &str = "-";
pub const RUPEE: &str = "₹";

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    Plain,
    Count,
    Currency,
}

impl FormatRule {
    pub fn for_key(key: CanonicalKey) -> FormatRule {
        match key {
            CanonicalKey::AvgWageRate | CanonicalKey::TotalWages => FormatRule::Currency,
            CanonicalKey::HouseholdsWorked
            | CanonicalKey::PersondaysGenerated
            | CanonicalKey::OngoingWorks
            | CanonicalKey::CompletedWorks => FormatRule::Count,
            CanonicalKey::FinYear
            | CanonicalKey::Month
            | CanonicalKey::StateName
            | CanonicalKey::DistrictName => FormatRule::Plain,
        }
    }
}

/// Fixed-point text with ties rounded away from zero.
fn fixed(n: f64, digits: usize) -> String {
    format!("{:.*}", digits, round_half_away(n, digits as i32))
}

fn abbreviate(num: f64) -> String {
    if num >= CRORE {
        format!("{} Cr", fixed(num / CRORE, 2))
    } else if num >= LAKH {
        format!("{} Lakh", fixed(num / LAKH, 2))
    } else if num >= THOUSAND {
        format!("{}K", fixed(num / THOUSAND, 1))
    } else {
        group_indian(num)
    }
}

/// Either the parsed number, or the formatted-as-is fallback text.
fn numeric(value: &Resolved) -> Result<f64, String> {
    match value {
        Resolved::Unavailable => Err(PLACEHOLDER.to_string()),
        Resolved::Value(v) => value_as_f64(v).ok_or_else(|| value_text(v)),
    }
}

pub fn format_count(value: &Resolved) -> String {
    match numeric(value) {
        Ok(n) => abbreviate(n),
        Err(passthrough) => passthrough,
    }
}

pub fn format_currency(value: &Resolved) -> String {
    match numeric(value) {
        Ok(n) => format!("{}{}", RUPEE, abbreviate(n)),
        Err(passthrough) => passthrough,
    }
}

pub fn format_percent(value: &Resolved) -> String {
    match numeric(value) {
        Ok(n) => format!("{}%", fixed(n, 1)),
        Err(passthrough) => passthrough,
    }
}

/// Comparison delta with an explicit sign for gains: `+12.3%`, `-4.0%`.
pub fn format_signed_percent(n: f64) -> String {
    if n > 0.0 {
        format!("+{}%", fixed(n, 1))
    } else {
        format!("{}%", fixed(n, 1))
    }
}

pub fn format_plain(value: &Resolved) -> String {
    match value {
        Resolved::Unavailable => PLACEHOLDER.to_string(),
        Resolved::Value(v) => value_text(v),
    }
}

/// Grouped but never abbreviated; used for table cells.
pub fn format_grouped(value: &Resolved) -> String {
    match numeric(value) {
        Ok(n) => group_indian(n),
        Err(passthrough) => passthrough,
    }
}

pub fn format_field(field: &ResolvedField) -> String {
    match FormatRule::for_key(field.key) {
        FormatRule::Plain => format_plain(&field.value),
        FormatRule::Count => format_count(&field.value),
        FormatRule::Currency => format_currency(&field.value),
    }
}
