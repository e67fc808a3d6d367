use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::error::ensure_percentage;

/// How the principal of a loan is repaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentType {
    /// Each installment carries interest and principal.
    Amortizing,
    /// Installments carry interest only; principal is repaid at maturity (in fine).
    InterestOnly,
}

impl RepaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amortizing => "amortizing",
            Self::InterestOnly => "interest_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amortizing" => Some(Self::Amortizing),
            "interest_only" | "in_fine" => Some(Self::InterestOnly),
            _ => None,
        }
    }
}

/// Split between interest and principal for amortizing loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationProfile {
    /// Constant principal each month; installments decline.
    LinearPrincipal,
    /// Constant installment; the principal share rises over time.
    #[default]
    ConstantAnnuity,
}

impl AmortizationProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearPrincipal => "linear_principal",
            Self::ConstantAnnuity => "constant_annuity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear_principal" | "linear" => Some(Self::LinearPrincipal),
            "constant_annuity" | "annuity" => Some(Self::ConstantAnnuity),
            _ => None,
        }
    }
}

/// A property loan as recorded by the surrounding application.
///
/// Rates are percentages (`3.2` for 3.2%). The calculation engines only
/// read loans; they never modify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub annual_interest_rate: Decimal,
    #[serde(default)]
    pub annual_insurance_rate: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub repayment_type: RepaymentType,
    /// Only meaningful for [`RepaymentType::Amortizing`].
    #[serde(default)]
    pub amortization_profile: AmortizationProfile,
    /// Stored installment; computed from the annuity formula when absent.
    #[serde(default)]
    pub monthly_payment: Option<Decimal>,
}

impl Loan {
    /// Number of monthly installments between the start and end dates.
    ///
    /// Only the year and month of each date count; installment `k` falls in
    /// the `k`-th month after the start month. May be zero or negative for
    /// invalid records.
    pub fn total_months(&self) -> i64 {
        let years = i64::from(self.end_date.year() - self.start_date.year());
        let months = i64::from(self.end_date.month()) - i64::from(self.start_date.month());
        years * 12 + months
    }

    /// Absolute month index (`year * 12 + month0`) of the first installment.
    pub(crate) fn first_month_index(&self) -> i64 {
        i64::from(self.start_date.year()) * 12 + i64::from(self.start_date.month0())
    }

    /// Whether the loan's date range touches `year`.
    pub fn is_active_in(
        &self,
        year: i32,
    ) -> bool {
        self.start_date.year() <= year && year <= self.end_date.year()
    }

    /// Annual interest rate as a monthly fraction.
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_interest_rate / Decimal::ONE_HUNDRED / Decimal::from(12)
    }

    pub fn insurance_rate(&self) -> Decimal {
        self.annual_insurance_rate.unwrap_or(Decimal::ZERO)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_fields()
            .map_err(|source| ValidationError::for_loan(&self.id, source))
    }

    fn validate_fields(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount {
                field: "amount",
                value: self.amount,
            });
        }
        ensure_percentage("annual_interest_rate", self.annual_interest_rate)?;
        if let Some(rate) = self.annual_insurance_rate {
            ensure_percentage("annual_insurance_rate", rate)?;
        }
        if let Some(payment) = self.monthly_payment.filter(|p| *p <= Decimal::ZERO) {
            return Err(ValidationError::NonPositiveAmount {
                field: "monthly_payment",
                value: payment,
            });
        }
        if self.total_months() <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "end_date",
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
