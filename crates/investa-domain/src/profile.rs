//! The investor profile record
//!
//! An `InvestorProfile` always carries all six fields. Values the model could
//! not supply are filled from the per-field defaults below, so there is no
//! partial or "missing" state to represent.

use std::fmt;

/// Default investor age
pub const DEFAULT_AGE: i64 = 30;

/// Default investment budget
pub const DEFAULT_BUDGET: f64 = 100_000.00;

/// Default start of the investment window (ISO `YYYY-MM-DD`)
pub const DEFAULT_START_DATE: &str = "2024-01-01";

/// Default end of the investment window (ISO `YYYY-MM-DD`)
pub const DEFAULT_END_DATE: &str = "2025-01-01";

/// Default exclusion preferences (none)
pub const DEFAULT_AVOID: &str = "";

/// Default annual salary
pub const DEFAULT_SALARY: f64 = 50_000.00;

/// Financial profile extracted from free text
///
/// Dates are kept as the strings the model produced; they are not checked
/// against a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorProfile {
    /// Investor age in years
    pub age: i64,

    /// Investment budget, rounded to cents
    pub budget: f64,

    /// Start of the investment window
    pub start_date: String,

    /// End of the investment window
    pub end_date: String,

    /// What the investor wants to stay away from
    pub avoid: String,

    /// Annual salary, rounded to cents
    pub salary: f64,
}

impl InvestorProfile {
    /// Field names in their fixed enumeration order
    pub const FIELDS: [&'static str; 6] =
        ["age", "budget", "start_date", "end_date", "avoid", "salary"];

    /// Check whether every field equals its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for InvestorProfile {
    /// The default record returned whenever extraction cannot complete
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            budget: DEFAULT_BUDGET,
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
            avoid: DEFAULT_AVOID.to_string(),
            salary: DEFAULT_SALARY,
        }
    }
}

impl fmt::Display for InvestorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "age={} budget={:.2} start_date={} end_date={} avoid={:?} salary={:.2}",
            self.age, self.budget, self.start_date, self.end_date, self.avoid, self.salary
        )
    }
}

/// Magnitude from which every `f64` is a whole number (2^52)
const WHOLE_NUMBER_THRESHOLD: f64 = 4_503_599_627_370_496.0;

/// Digits needed to print any `f64` fraction exactly (subnormals reach 1074)
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Round a monetary amount to two decimal places
///
/// Rounding works on the exact binary value, so `2.675` (stored as
/// 2.67499...) becomes `2.67`. Exact halfway cases such as `0.125` round to
/// the even cent. Non-finite values and magnitudes of 2^52 or more come back
/// unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= WHOLE_NUMBER_THRESHOLD {
        return value;
    }

    // Enough precision that the formatter never rounds
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return value;
    };
    let (Ok(whole), Some(kept), Some(next)) = (
        whole.parse::<i64>(),
        fraction.get(..2).and_then(|d| d.parse::<i64>().ok()),
        fraction.as_bytes().get(2).map(|d| d - b'0'),
    ) else {
        return value;
    };
    let remainder_is_zero = fraction.bytes().skip(3).all(|d| d == b'0');

    let mut cents = whole * 100 + kept;
    let round_up = next > 5 || (next == 5 && (!remainder_is_zero || cents % 2 == 1));
    if round_up {
        cents += 1;
    }

    // Parsing the decimal text yields the nearest f64 to the rounded amount
    let rounded = format!("{}.{:02}", cents / 100, cents % 100)
        .parse::<f64>()
        .unwrap_or(value.abs());
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}
