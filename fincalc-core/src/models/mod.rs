mod financial_profile;
mod household;
mod loan;
mod regime;
mod tax_bracket;
mod tax_result;
mod yearly_interest;

pub use financial_profile::FinancialProfile;
pub use household::HouseholdSituation;
pub use loan::{AmortizationProfile, Loan, RepaymentType};
pub use regime::{RealCharges, RecommendedRegime, RegimeComparison, RegimeResult};
pub use tax_bracket::{TaxBracket, validate_brackets};
pub use tax_result::{TaxResult, TaxSnapshot};
pub use yearly_interest::{LoanYearDetail, YearlyInterestRow};
