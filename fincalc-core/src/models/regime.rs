use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Actual, substantiated rental expenses deductible under the régime réel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealCharges {
    #[serde(default)]
    pub loan_interest: Decimal,
    #[serde(default)]
    pub property_tax: Decimal,
    #[serde(default)]
    pub insurance: Decimal,
    #[serde(default)]
    pub management_fees: Decimal,
    #[serde(default)]
    pub maintenance: Decimal,
    #[serde(default)]
    pub other: Decimal,
}

impl RealCharges {
    /// Charges expressed as a single lump sum, booked under `other`.
    pub fn lump_sum(amount: Decimal) -> Self {
        Self {
            other: amount,
            ..Self::default()
        }
    }

    pub fn total(&self) -> Decimal {
        self.loan_interest
            + self.property_tax
            + self.insurance
            + self.management_fees
            + self.maintenance
            + self.other
    }

    pub(crate) fn fields(&self) -> [(&'static str, Decimal); 6] {
        [
            ("loan_interest", self.loan_interest),
            ("property_tax", self.property_tax),
            ("insurance", self.insurance),
            ("management_fees", self.management_fees),
            ("maintenance", self.maintenance),
            ("other", self.other),
        ]
    }
}

/// Tax owed on rental income under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub gross_rental_income: Decimal,
    pub deduction: Decimal,
    pub taxable_income: Decimal,
    pub social_tax: Decimal,
    pub income_tax: Decimal,
    pub total_tax: Decimal,
    /// Total tax as a percentage of gross rental income.
    pub effective_rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedRegime {
    MicroFoncier,
    Reel,
    /// Both regimes cost the same.
    NoPreference,
}

/// Side-by-side micro-foncier and régime réel figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub micro: RegimeResult,
    pub reel: RegimeResult,
    pub recommended: RecommendedRegime,
    pub is_micro_better: bool,
    /// Absolute difference between the two total taxes.
    pub savings: Decimal,
    /// Whether gross rental income is within the micro-foncier ceiling.
    pub micro_eligible: bool,
    /// Charges in excess of rental income under the régime réel.
    pub reel_deficit: Decimal,
}
