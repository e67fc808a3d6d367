use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One slice of a progressive income tax table.
///
/// `max` is `None` for the top, unbounded bracket. `rate` is a fraction
/// (`0.11` for 11%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    #[serde(default)]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { min, max, rate }
    }

    /// The 2025 income tax table (revenus 2024).
    pub fn table_2025() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), Some(dec!(11294)), dec!(0)),
            TaxBracket::new(dec!(11295), Some(dec!(28797)), dec!(0.11)),
            TaxBracket::new(dec!(28798), Some(dec!(82341)), dec!(0.30)),
            TaxBracket::new(dec!(82342), Some(dec!(177106)), dec!(0.41)),
            TaxBracket::new(dec!(177107), None, dec!(0.45)),
        ]
    }
}

/// Checks that a bracket table is usable by the bracket calculator.
///
/// The table must be non-empty, sorted ascending, non-overlapping, end with
/// an unbounded bracket, and carry rates in `[0, 1]`.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), ValidationError> {
    let Some(last) = brackets.last() else {
        return Err(ValidationError::InvalidBrackets(
            "no tax brackets provided".to_string(),
        ));
    };
    if last.max.is_some() {
        return Err(ValidationError::InvalidBrackets(
            "last bracket must be unbounded".to_string(),
        ));
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ValidationError::InvalidBrackets(format!(
                "bracket {index} rate {} is outside [0, 1]",
                bracket.rate
            )));
        }
        if let Some(max) = bracket.max {
            if max < bracket.min {
                return Err(ValidationError::InvalidBrackets(format!(
                    "bracket {index} max {max} is below its min {}",
                    bracket.min
                )));
            }
        }
        if let Some(next) = brackets.get(index + 1) {
            match bracket.max {
                None => {
                    return Err(ValidationError::InvalidBrackets(format!(
                        "bracket {index} is unbounded but is not the last bracket"
                    )));
                }
                Some(max) if next.min <= max => {
                    return Err(ValidationError::InvalidBrackets(format!(
                        "bracket {} starting at {} overlaps bracket {index} ending at {max}",
                        index + 1,
                        next.min
                    )));
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn table_2025_is_valid() {
        assert_eq!(validate_brackets(&TaxBracket::table_2025()), Ok(()));
    }

    #[test]
    fn table_2025_has_five_brackets_ending_unbounded() {
        let table = TaxBracket::table_2025();

        assert_eq!(table.len(), 5);
        assert_eq!(table[4].min, dec!(177107));
        assert_eq!(table[4].max, None);
        assert_eq!(table[4].rate, dec!(0.45));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            validate_brackets(&[]),
            Err(ValidationError::InvalidBrackets(_))
        ));
    }

    #[test]
    fn bounded_last_bracket_is_rejected() {
        let table = vec![TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.1))];

        assert!(validate_brackets(&table).is_err());
    }

    #[test]
    fn overlapping_brackets_are_rejected() {
        let table = vec![
            TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.1)),
            TaxBracket::new(dec!(900), None, dec!(0.2)),
        ];

        assert!(validate_brackets(&table).is_err());
    }

    #[test]
    fn rate_above_one_is_rejected() {
        let table = vec![TaxBracket::new(dec!(0), None, dec!(1.5))];

        assert!(validate_brackets(&table).is_err());
    }
}
