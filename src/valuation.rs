//! Line valuation.
//!
//! Monetary values on an order line are always derived, never stored from
//! client input: requested value from the requested quantity/rate pair and
//! approved value from the approved pair. Absent inputs count as zero, so
//! a line with no approval data carries an approved value of zero rather
//! than NULL.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional precision of every derived monetary value.
pub const VALUE_SCALE: u32 = 6;

/// Computes `quantity * rate`, treating a missing operand as zero.
///
/// The result is rounded to [`VALUE_SCALE`] decimal digits, half away from
/// zero. Pure function; malformed input has already been coerced to `None`
/// by [`lenient::decimal_opt`] at the deserialization boundary.
pub fn line_value(quantity: Option<Decimal>, rate: Option<Decimal>) -> Decimal {
    let quantity = quantity.unwrap_or_default();
    let rate = rate.unwrap_or_default();
    (quantity * rate).round_dp_with_strategy(VALUE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub mod lenient {
    //! Serde helpers for loosely-typed quantity/rate fields.
    //!
    //! Callers send quantities and rates as JSON numbers, numeric strings,
    //! or occasionally garbage. Anything that does not parse as a finite
    //! number becomes `None`; it is never a deserialization error.

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Deserializes an optional numeric field with lenient coercion.
    pub fn decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(coerce))
    }

    fn coerce(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
    }

    fn parse_decimal(raw: &str) -> Option<Decimal> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[test]
    fn multiplies_and_rounds_to_six_places() {
        assert_eq!(line_value(Some(dec!(10)), Some(dec!(15.5))), dec!(155));
        assert_eq!(line_value(Some(dec!(8)), Some(dec!(15.0))), dec!(120));
        assert_eq!(
            line_value(Some(dec!(1.2345678)), Some(dec!(1))),
            dec!(1.234568)
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(line_value(Some(dec!(1.0000005)), Some(dec!(1))), dec!(1.000001));
        assert_eq!(
            line_value(Some(dec!(-1.0000005)), Some(dec!(1))),
            dec!(-1.000001)
        );
    }

    #[test]
    fn missing_operands_count_as_zero() {
        assert_eq!(line_value(None, None), Decimal::ZERO);
        assert_eq!(line_value(Some(dec!(8)), None), Decimal::ZERO);
        assert_eq!(line_value(None, Some(dec!(15))), Decimal::ZERO);
    }

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "lenient::decimal_opt")]
        qty: Option<Decimal>,
    }

    fn qty(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Payload>(json).unwrap().qty
    }

    #[test]
    fn lenient_accepts_numbers_and_numeric_strings() {
        assert_eq!(qty(r#"{"qty": 10}"#), Some(dec!(10)));
        assert_eq!(qty(r#"{"qty": 15.5}"#), Some(dec!(15.5)));
        assert_eq!(qty(r#"{"qty": "8.25"}"#), Some(dec!(8.25)));
        assert_eq!(qty(r#"{"qty": " 3 "}"#), Some(dec!(3)));
    }

    #[test]
    fn lenient_coerces_garbage_to_none() {
        assert_eq!(qty(r#"{"qty": null}"#), None);
        assert_eq!(qty(r#"{}"#), None);
        assert_eq!(qty(r#"{"qty": "not-a-number"}"#), None);
        assert_eq!(qty(r#"{"qty": ""}"#), None);
        assert_eq!(qty(r#"{"qty": [1]}"#), None);
        assert_eq!(qty(r#"{"qty": {"v": 1}}"#), None);
    }

    #[test]
    fn lenient_none_values_yield_zero_value() {
        let approved_qty = qty(r#"{"qty": "oops"}"#);
        assert_eq!(line_value(approved_qty, Some(dec!(15))), Decimal::ZERO);
    }
}
