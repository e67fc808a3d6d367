//! Month-by-month replay of a single loan.
//!
//! Installment `k` (0-based) falls in the `k`-th month after the loan's start
//! month. Each installment charges interest on the capital outstanding
//! before it and repays principal according to the repayment model:
//!
//! | Model | Principal per installment |
//! |-------|---------------------------|
//! | interest only | 0, then the full amount on the last installment |
//! | linear principal | amount / months; the last installment settles any residual |
//! | constant annuity | payment − interest, capped at the outstanding capital |
//!
//! Capital never goes below zero.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{floor_at_zero, percent_to_fraction, year_fraction};
use crate::{AmortizationProfile, Loan, RepaymentType, ValidationError};

/// Constant monthly installment of an annuity loan.
///
/// `P = C·r·(1+r)^n / ((1+r)^n − 1)`, or `C / n` when `r` is zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::amortization::annuity_payment;
///
/// assert_eq!(annuity_payment(dec!(12000), dec!(0), 24).unwrap(), dec!(500));
/// ```
///
/// # Errors
///
/// Returns [`ValidationError::Overflow`] when `(1+r)^n` cannot be represented.
pub fn annuity_payment(
    capital: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Decimal, ValidationError> {
    if monthly_rate.is_zero() {
        return Ok(capital / Decimal::from(months));
    }

    let factor = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(months))
        .ok_or(ValidationError::Overflow {
            field: "annual_interest_rate",
            months,
        })?;
    capital
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(factor - Decimal::ONE))
        .ok_or(ValidationError::Overflow {
            field: "annual_interest_rate",
            months,
        })
}

/// One monthly installment produced by the replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installment {
    /// Absolute month index: `year * 12 + month0`.
    pub month_index: i64,
    pub interest: Decimal,
    pub principal: Decimal,
    /// Capital outstanding after this installment.
    pub remaining_capital: Decimal,
}

impl Installment {
    pub fn year(&self) -> i32 {
        // Month indexes come from chrono years, so they fit back into an i32.
        self.month_index.div_euclid(12) as i32
    }
}

/// Iterator over a loan's installments, in order.
#[derive(Debug, Clone)]
pub struct InstallmentReplay<'a> {
    loan: &'a Loan,
    first_month: i64,
    total_months: u32,
    monthly_rate: Decimal,
    linear_principal: Decimal,
    annuity_payment: Decimal,
    remaining: Decimal,
    next: u32,
}

impl<'a> InstallmentReplay<'a> {
    /// Starts a replay at the loan's first installment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the loan record is invalid or its
    /// annuity cannot be computed.
    pub fn new(loan: &'a Loan) -> Result<Self, ValidationError> {
        loan.validate()?;

        // validate() guarantees at least one month
        let total_months = u32::try_from(loan.total_months()).map_err(|_| {
            ValidationError::for_loan(
                &loan.id,
                ValidationError::NonPositiveDuration {
                    field: "end_date",
                    start: loan.start_date,
                    end: loan.end_date,
                },
            )
        })?;
        let monthly_rate = loan.monthly_rate();

        let annuity = match (loan.repayment_type, loan.amortization_profile) {
            (RepaymentType::Amortizing, AmortizationProfile::ConstantAnnuity) => {
                match loan.monthly_payment {
                    Some(payment) => payment,
                    None => annuity_payment(loan.amount, monthly_rate, total_months)
                        .map_err(|e| ValidationError::for_loan(&loan.id, e))?,
                }
            }
            _ => Decimal::ZERO,
        };

        if loan.repayment_type == RepaymentType::Amortizing
            && loan.amortization_profile == AmortizationProfile::ConstantAnnuity
            && annuity <= loan.amount * monthly_rate
        {
            warn!(
                loan_id = %loan.id,
                payment = %annuity,
                "monthly payment does not cover first month interest; capital will not decrease"
            );
        }

        Ok(Self {
            loan,
            first_month: loan.first_month_index(),
            total_months,
            monthly_rate,
            linear_principal: loan.amount / Decimal::from(total_months),
            annuity_payment: annuity,
            remaining: loan.amount,
            next: 0,
        })
    }

    pub fn total_months(&self) -> u32 {
        self.total_months
    }

    /// Installment amount of an annuity loan; zero for other models.
    pub fn annuity_payment(&self) -> Decimal {
        self.annuity_payment
    }

    fn principal_for(
        &self,
        interest: Decimal,
        is_last: bool,
    ) -> Decimal {
        match (self.loan.repayment_type, self.loan.amortization_profile) {
            (RepaymentType::InterestOnly, _) => {
                if is_last {
                    self.remaining
                } else {
                    Decimal::ZERO
                }
            }
            (RepaymentType::Amortizing, AmortizationProfile::LinearPrincipal) => {
                if is_last {
                    self.remaining
                } else {
                    self.linear_principal.min(self.remaining)
                }
            }
            (RepaymentType::Amortizing, AmortizationProfile::ConstantAnnuity) => {
                floor_at_zero(self.annuity_payment - interest).min(self.remaining)
            }
        }
    }
}

impl Iterator for InstallmentReplay<'_> {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.next >= self.total_months {
            return None;
        }
        let k = self.next;
        self.next += 1;

        let interest = self.remaining * self.monthly_rate;
        let principal = self.principal_for(interest, self.next == self.total_months);
        self.remaining = floor_at_zero(self.remaining - principal);

        Some(Installment {
            month_index: self.first_month + i64::from(k),
            interest,
            principal,
            remaining_capital: self.remaining,
        })
    }
}

/// One loan's figures over one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanYearSlice {
    pub year: i32,
    /// Installments falling in the year.
    pub active_months: u32,
    pub interest: Decimal,
    pub principal_repaid: Decimal,
    pub insurance: Decimal,
    /// Capital after the last installment of the year, or carried in from
    /// earlier years when the year has none.
    pub remaining_capital: Decimal,
}

impl LoanYearSlice {
    fn opening(
        year: i32,
        capital: Decimal,
    ) -> Self {
        Self {
            year,
            active_months: 0,
            interest: Decimal::ZERO,
            principal_repaid: Decimal::ZERO,
            insurance: Decimal::ZERO,
            remaining_capital: capital,
        }
    }

    fn record(
        &mut self,
        installment: &Installment,
    ) {
        self.active_months += 1;
        self.interest += installment.interest;
        self.principal_repaid += installment.principal;
        self.remaining_capital = installment.remaining_capital;
    }

    /// Applies the per-year closed forms once all installments are recorded.
    ///
    /// Interest-only interest and insurance are pro-rated on the initial
    /// amount by the share of the year the loan was active.
    fn close(
        mut self,
        loan: &Loan,
    ) -> Self {
        let share = year_fraction(self.active_months);
        if loan.repayment_type == RepaymentType::InterestOnly {
            self.interest = loan.amount * percent_to_fraction(loan.annual_interest_rate) * share;
        }
        self.insurance = loan.amount * percent_to_fraction(loan.insurance_rate()) * share;
        self
    }
}

/// Replays `loan` from its first installment through the end of `year`.
///
/// Every call starts from scratch; [`build_schedule`] produces the same
/// figures for all years in one pass.
///
/// # Errors
///
/// Returns [`ValidationError`] when the loan record is invalid.
pub fn replay_through_year(
    loan: &Loan,
    year: i32,
) -> Result<LoanYearSlice, ValidationError> {
    let mut slice = LoanYearSlice::opening(year, loan.amount);

    for installment in InstallmentReplay::new(loan)? {
        let installment_year = installment.year();
        if installment_year > year {
            break;
        }
        if installment_year == year {
            slice.record(&installment);
        } else {
            slice.remaining_capital = installment.remaining_capital;
        }
    }

    Ok(slice.close(loan))
}

/// Replays `loan` once and returns a slice for every year of its date range.
///
/// # Errors
///
/// Returns [`ValidationError`] when the loan record is invalid.
pub fn build_schedule(loan: &Loan) -> Result<BTreeMap<i32, LoanYearSlice>, ValidationError> {
    let mut slices: BTreeMap<i32, LoanYearSlice> = BTreeMap::new();
    let mut carried = loan.amount;

    for installment in InstallmentReplay::new(loan)? {
        let year = installment.year();
        slices
            .entry(year)
            .or_insert_with(|| LoanYearSlice::opening(year, carried))
            .record(&installment);
        carried = installment.remaining_capital;
    }

    // Years inside the date range after the final installment.
    for year in loan.start_date.year()..=loan.end_date.year() {
        slices
            .entry(year)
            .or_insert_with(|| LoanYearSlice::opening(year, carried));
    }

    Ok(slices
        .into_iter()
        .map(|(year, slice)| (year, slice.close(loan)))
        .collect())
}

/// Total interest over the loan's life from the closed-form formulas.
///
/// Returns `None` for annuity loans with a stored payment, which need not
/// amortize the loan exactly.
///
/// # Errors
///
/// Returns [`ValidationError`] when the loan record is invalid.
pub fn closed_form_total_interest(loan: &Loan) -> Result<Option<Decimal>, ValidationError> {
    let replay = InstallmentReplay::new(loan)?;
    let months = Decimal::from(replay.total_months());
    let monthly_rate = loan.monthly_rate();

    let total = match (loan.repayment_type, loan.amortization_profile) {
        (RepaymentType::InterestOnly, _) => {
            Some(loan.amount * percent_to_fraction(loan.annual_interest_rate) * months / Decimal::from(12))
        }
        (RepaymentType::Amortizing, AmortizationProfile::LinearPrincipal) => {
            Some(loan.amount * monthly_rate * (months + Decimal::ONE) / Decimal::TWO)
        }
        (RepaymentType::Amortizing, AmortizationProfile::ConstantAnnuity) => {
            if loan.monthly_payment.is_some() {
                None
            } else {
                Some(replay.annuity_payment() * months - loan.amount)
            }
        }
    };
    Ok(total)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(
        y: i32,
        m: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn loan(
        repayment_type: RepaymentType,
        amortization_profile: AmortizationProfile,
    ) -> Loan {
        Loan {
            id: "l1".to_string(),
            name: "Rental flat".to_string(),
            amount: dec!(100000),
            annual_interest_rate: dec!(2.4),
            annual_insurance_rate: None,
            start_date: date(2020, 1),
            end_date: date(2040, 1),
            repayment_type,
            amortization_profile,
            monthly_payment: None,
        }
    }

    fn linear() -> Loan {
        loan(RepaymentType::Amortizing, AmortizationProfile::LinearPrincipal)
    }

    fn annuity() -> Loan {
        loan(RepaymentType::Amortizing, AmortizationProfile::ConstantAnnuity)
    }

    fn interest_only() -> Loan {
        let mut l = loan(RepaymentType::InterestOnly, AmortizationProfile::ConstantAnnuity);
        l.amount = dec!(120000);
        l.annual_interest_rate = dec!(3);
        l.end_date = date(2030, 1);
        l
    }

    fn assert_close(
        actual: Decimal,
        expected: Decimal,
        tolerance: Decimal,
    ) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    // =========================================================================
    // annuity_payment tests
    // =========================================================================

    #[test]
    fn annuity_payment_zero_rate_falls_back_to_linear() {
        assert_eq!(annuity_payment(dec!(100000), dec!(0), 240).unwrap(), dec!(100000) / dec!(240));
    }

    #[test]
    fn annuity_payment_matches_standard_formula() {
        // 100000 at 2.4% over 20 years is about 525.04 a month
        let payment = annuity_payment(dec!(100000), dec!(0.002), 240).unwrap();

        assert_close(payment, dec!(525.04), dec!(0.01));
    }

    #[test]
    fn annuity_payment_overflow_is_reported() {
        let result = annuity_payment(dec!(100000), dec!(0.5), 1200);

        assert!(matches!(result, Err(ValidationError::Overflow { .. })));
    }

    // =========================================================================
    // InstallmentReplay tests
    // =========================================================================

    #[test]
    fn replay_yields_one_installment_per_month() {
        let loan = linear();
        let replay = InstallmentReplay::new(&loan).unwrap();

        assert_eq!(replay.count(), 240);
    }

    #[test]
    fn linear_principal_repays_full_amount() {
        let installments: Vec<_> = InstallmentReplay::new(&linear()).unwrap().collect();

        let principal: Decimal = installments.iter().map(|i| i.principal).sum();

        assert_close(principal, dec!(100000), dec!(0.01));
        assert_eq!(installments.last().unwrap().remaining_capital, dec!(0));
    }

    #[test]
    fn linear_interest_is_charged_on_capital_before_payment() {
        let installments: Vec<_> = InstallmentReplay::new(&linear()).unwrap().take(2).collect();

        assert_eq!(installments[0].interest, dec!(200));
        assert_close(installments[1].interest, (dec!(100000) - dec!(100000) / dec!(240)) * dec!(0.002), dec!(0.0000001));
    }

    #[test]
    fn annuity_capital_ends_at_zero() {
        let installments: Vec<_> = InstallmentReplay::new(&annuity()).unwrap().collect();

        assert_close(installments.last().unwrap().remaining_capital, dec!(0), dec!(0.01));
        assert!(installments.iter().all(|i| i.remaining_capital >= Decimal::ZERO));
    }

    #[test]
    fn annuity_with_oversized_stored_payment_floors_capital() {
        let mut l = annuity();
        l.monthly_payment = Some(dec!(60000));

        let installments: Vec<_> = InstallmentReplay::new(&l).unwrap().collect();

        assert_eq!(installments[1].remaining_capital, dec!(0));
        assert_eq!(installments[2].principal, dec!(0));
        assert_eq!(installments[2].interest, dec!(0));
    }

    #[test]
    fn zero_rate_annuity_repays_evenly() {
        let mut l = annuity();
        l.annual_interest_rate = dec!(0);

        let installments: Vec<_> = InstallmentReplay::new(&l).unwrap().collect();

        assert!(installments.iter().all(|i| i.interest.is_zero()));
        assert_close(installments.last().unwrap().remaining_capital, dec!(0), dec!(0.01));
    }

    #[test]
    fn interest_only_repays_principal_at_maturity() {
        let installments: Vec<_> = InstallmentReplay::new(&interest_only()).unwrap().collect();

        assert_eq!(installments.len(), 120);
        assert!(installments[..119].iter().all(|i| i.principal.is_zero()));
        assert_eq!(installments[119].principal, dec!(120000));
        assert_eq!(installments[119].remaining_capital, dec!(0));
    }

    #[test]
    fn installment_year_follows_month_index() {
        let mut l = linear();
        l.start_date = date(2020, 11);

        let years: Vec<i32> = InstallmentReplay::new(&l).unwrap().take(3).map(|i| i.year()).collect();

        assert_eq!(years, vec![2020, 2020, 2021]);
    }

    #[test]
    fn invalid_loan_is_rejected() {
        let mut l = linear();
        l.end_date = l.start_date;

        assert!(InstallmentReplay::new(&l).is_err());
    }

    // =========================================================================
    // replay_through_year / build_schedule tests
    // =========================================================================

    #[test]
    fn interest_only_full_year_interest() {
        let slice = replay_through_year(&interest_only(), 2024).unwrap();

        assert_eq!(slice.active_months, 12);
        assert_eq!(slice.interest, dec!(3600));
        assert_eq!(slice.remaining_capital, dec!(120000));
    }

    #[test]
    fn interest_only_partial_first_year_is_prorated() {
        let mut l = interest_only();
        l.start_date = date(2020, 7);

        let slice = replay_through_year(&l, 2020).unwrap();

        assert_eq!(slice.active_months, 6);
        assert_eq!(slice.interest, dec!(1800));
    }

    #[test]
    fn insurance_is_prorated_on_initial_amount() {
        let mut l = linear();
        l.annual_insurance_rate = Some(dec!(0.3));

        let slice = replay_through_year(&l, 2030).unwrap();

        assert_eq!(slice.insurance, dec!(300));
    }

    #[test]
    fn year_after_last_installment_has_no_months() {
        let slice = replay_through_year(&linear(), 2040).unwrap();

        assert_eq!(slice.active_months, 0);
        assert_eq!(slice.interest, dec!(0));
        assert_eq!(slice.remaining_capital, dec!(0));
    }

    #[test]
    fn schedule_matches_per_year_replay_exactly() {
        for l in [linear(), annuity(), interest_only()] {
            let schedule = build_schedule(&l).unwrap();

            for (year, slice) in &schedule {
                assert_eq!(slice, &replay_through_year(&l, *year).unwrap());
            }
        }
    }

    #[test]
    fn schedule_covers_every_year_of_the_date_range() {
        let schedule = build_schedule(&linear()).unwrap();

        assert_eq!(schedule.keys().copied().collect::<Vec<_>>(), (2020..=2040).collect::<Vec<_>>());
    }

    #[test]
    fn schedule_principal_sums_to_amount() {
        let schedule = build_schedule(&linear()).unwrap();

        let principal: Decimal = schedule.values().map(|s| s.principal_repaid).sum();

        assert_close(principal, dec!(100000), dec!(0.01));
        assert_eq!(schedule[&2039].remaining_capital, dec!(0));
    }

    // =========================================================================
    // closed_form_total_interest tests
    // =========================================================================

    #[test]
    fn closed_form_matches_schedule_for_every_model() {
        for l in [linear(), annuity(), interest_only()] {
            let expected = closed_form_total_interest(&l).unwrap().unwrap();
            let replayed: Decimal = build_schedule(&l).unwrap().values().map(|s| s.interest).sum();

            assert_close(replayed, expected, dec!(0.01));
        }
    }

    #[test]
    fn closed_form_linear_total() {
        // 100000 * 0.002 * 241 / 2
        assert_eq!(closed_form_total_interest(&linear()).unwrap(), Some(dec!(24100)));
    }

    #[test]
    fn closed_form_interest_only_total() {
        assert_eq!(closed_form_total_interest(&interest_only()).unwrap(), Some(dec!(36000)));
    }

    #[test]
    fn closed_form_unavailable_with_stored_payment() {
        let mut l = annuity();
        l.monthly_payment = Some(dec!(600));

        assert_eq!(closed_form_total_interest(&l).unwrap(), None);
    }
}
