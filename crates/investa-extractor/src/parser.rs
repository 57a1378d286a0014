//! Parse LLM output into an investor profile
//!
//! Models rarely return exactly the object they were asked for. The raw text
//! is narrowed to its outermost `{...}` span, parsed, and every field is
//! coerced on its own: absent or falsy values fall back to that field's
//! default, while a value that is present but unusable fails the whole parse.

use crate::error::ExtractorError;
use investa_domain::profile::{
    round_to_cents, DEFAULT_AGE, DEFAULT_AVOID, DEFAULT_BUDGET, DEFAULT_END_DATE,
    DEFAULT_SALARY, DEFAULT_START_DATE,
};
use investa_domain::InvestorProfile;
use serde_json::{Map, Value};

/// Parse a raw LLM response into a fully populated profile
pub fn parse_llm_response(response: &str) -> Result<InvestorProfile, ExtractorError> {
    let span = extract_json_span(response.trim()).ok_or_else(|| {
        ExtractorError::MalformedResponse("No JSON object found in response".to_string())
    })?;

    let json: Value = serde_json::from_str(span)?;

    let object = json.as_object().ok_or_else(|| {
        ExtractorError::MalformedResponse("Expected a JSON object".to_string())
    })?;

    coerce_profile(object)
}

/// Locate the span from the first `{` to the last `}`
///
/// This is greedy: prose containing its own braces before or after the real
/// object widens the span and usually makes it unparseable.
pub fn extract_json_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// Build a profile from a parsed object, ignoring keys outside the schema
fn coerce_profile(object: &Map<String, Value>) -> Result<InvestorProfile, ExtractorError> {
    Ok(InvestorProfile {
        age: coerce_age(object.get("age"))?,
        budget: coerce_amount("budget", object.get("budget"), DEFAULT_BUDGET)?,
        start_date: coerce_text("start_date", object.get("start_date"), DEFAULT_START_DATE)?,
        end_date: coerce_text("end_date", object.get("end_date"), DEFAULT_END_DATE)?,
        avoid: coerce_text("avoid", object.get("avoid"), DEFAULT_AVOID)?,
        salary: coerce_amount("salary", object.get("salary"), DEFAULT_SALARY)?,
    })
}

/// Falsy values count as absent
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Return the value only if it is present and truthy
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_falsy(v))
}

fn coerce_age(value: Option<&Value>) -> Result<i64, ExtractorError> {
    let Some(value) = present(value) else {
        return Ok(DEFAULT_AGE);
    };

    match value {
        // Only `true` survives the falsy filter
        Value::Bool(_) => Ok(1),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(coercion("age", format!("{} is out of range", n))),
            }
        }
        Value::String(s) => strip_digit_underscores(s.trim())
            .ok_or_else(|| coercion("age", format!("'{}' has a misplaced '_'", s)))?
            .parse::<i64>()
            .map_err(|e| coercion("age", format!("'{}' is not an integer: {}", s, e))),
        other => Err(coercion("age", format!("expected an integer, got {}", kind(other)))),
    }
}

fn coerce_amount(
    field: &'static str,
    value: Option<&Value>,
    default: f64,
) -> Result<f64, ExtractorError> {
    let Some(value) = present(value) else {
        return Ok(default);
    };

    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(coercion(field, format!("expected a number, got {}", kind(other))));
        }
    };

    let cleaned = text.replace(',', "");
    let amount = strip_digit_underscores(cleaned.trim())
        .ok_or_else(|| coercion(field, format!("'{}' has a misplaced '_'", text)))?
        .parse::<f64>()
        .map_err(|e| coercion(field, format!("'{}' is not a number: {}", text, e)))?;

    let rounded = round_to_cents(amount);
    if !rounded.is_finite() {
        return Err(coercion(field, format!("'{}' is not a finite amount", text)));
    }

    Ok(rounded)
}

/// Drop `_` digit-group separators, which are only allowed between two digits
fn strip_digit_underscores(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
        let digit_after = bytes.get(i + 1).is_some_and(|d| d.is_ascii_digit());
        if !(digit_before && digit_after) {
            return None;
        }
    }
    Some(text.replace('_', ""))
}

fn coerce_text(
    field: &'static str,
    value: Option<&Value>,
    default: &str,
) -> Result<String, ExtractorError> {
    let Some(value) = present(value) else {
        return Ok(default.to_string());
    };

    match value {
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        coercion(field, format!("list entries must be scalars, got {}", kind(item)))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(", "))
        }
        other => scalar_text(other)
            .ok_or_else(|| coercion(field, format!("expected text, got {}", kind(other)))),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn coercion(field: &'static str, reason: String) -> ExtractorError {
    ExtractorError::Coercion { field, reason }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: arbitrary model output never panics the parser
        #[test]
        fn test_parse_is_total(response in ".*") {
            let _ = parse_llm_response(&response);
        }

        /// Property: the span, when found, is delimited by braces
        #[test]
        fn test_span_is_brace_delimited(response in ".*") {
            if let Some(span) = extract_json_span(&response) {
                prop_assert_eq!(span.chars().next(), Some('{'));
                prop_assert_eq!(span.chars().last(), Some('}'));
            }
        }

        /// Property: a well-formed object survives arbitrary brace-free prose around it
        #[test]
        fn test_object_in_prose_round_trips(
            prefix in "[^{}]*",
            suffix in "[^{}]*",
            age in 1i64..120,
            budget in 1u32..10_000_000,
            avoid in "[a-z ]{0,20}",
        ) {
            let object = serde_json::json!({
                "age": age,
                "budget": budget,
                "avoid": avoid,
            });
            let response = format!("{}{}{}", prefix, object, suffix);

            let profile = parse_llm_response(&response).unwrap();
            prop_assert_eq!(profile.age, age);
            prop_assert_eq!(profile.budget, budget as f64);
            if avoid.is_empty() {
                prop_assert_eq!(profile.avoid, DEFAULT_AVOID);
            } else {
                prop_assert_eq!(profile.avoid, avoid);
            }
        }
    }
}
