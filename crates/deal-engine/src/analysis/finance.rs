use super::domain::round2;
use serde::{Deserialize, Serialize};

/// Hard-money lending assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceDefaults {
    /// Loan-to-value ratio (0.90 = 90%).
    pub ltv: f64,
    /// Points charged up front (0.02 = 2%).
    pub points_pct: f64,
    /// Annual interest rate (0.10 = 10%).
    pub interest_pct: f64,
    /// Expected hold in months.
    pub months_held: u32,
}

impl Default for FinanceDefaults {
    fn default() -> Self {
        Self {
            ltv: 0.90,
            points_pct: 0.02,
            interest_pct: 0.10,
            months_held: 6,
        }
    }
}

/// Derived financing costs for one loan scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceResult {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_points: f64,
    pub total_finance_cost: f64,
}

/// Financing assumptions and derived costs, flattened for the analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceBreakdown {
    pub ltv: f64,
    pub points_pct: f64,
    pub interest_pct: f64,
    pub months_held: u32,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_points: f64,
    pub total_finance_cost: f64,
}

impl FinanceBreakdown {
    pub fn new(defaults: &FinanceDefaults, result: &FinanceResult) -> Self {
        Self {
            ltv: defaults.ltv,
            points_pct: defaults.points_pct,
            interest_pct: defaults.interest_pct,
            months_held: defaults.months_held,
            loan_amount: result.loan_amount,
            monthly_payment: result.monthly_payment,
            total_interest: result.total_interest,
            total_points: result.total_points,
            total_finance_cost: result.total_finance_cost,
        }
    }
}

const DEFAULT_SELLING_PCT: f64 = 0.07;
const DEFAULT_MAO_ARV_PCT: f64 = 0.75;

/// Hard money loan costs.
///
/// Interest is simple and pro-rated monthly over the basis (loan + rehab);
/// points apply to the same basis. A zero-month hold produces a zero
/// monthly payment rather than dividing by zero.
pub fn calculate_finance(
    offer_price: f64,
    rehab_cost: f64,
    defaults: &FinanceDefaults,
) -> FinanceResult {
    let loan_amount = defaults.ltv * offer_price;
    let total_basis = loan_amount + rehab_cost;

    let total_interest = total_basis * defaults.interest_pct / 12.0 * defaults.months_held as f64;
    let total_points = total_basis * defaults.points_pct;
    let total_finance_cost = total_interest + total_points;
    let monthly_payment = if defaults.months_held > 0 {
        total_finance_cost / defaults.months_held as f64
    } else {
        0.0
    };

    FinanceResult {
        loan_amount: round2(loan_amount),
        monthly_payment: round2(monthly_payment),
        total_interest: round2(total_interest),
        total_points: round2(total_points),
        total_finance_cost: round2(total_finance_cost),
    }
}

/// Agent commission plus closing costs, at the default 7% of ARV.
pub fn calculate_selling_costs(arv: f64) -> f64 {
    calculate_selling_costs_with(arv, DEFAULT_SELLING_PCT)
}

pub fn calculate_selling_costs_with(arv: f64, pct: f64) -> f64 {
    round2(arv * pct)
}

/// Maximum allowable offer for a wholesale exit: 75% of ARV less repairs.
pub fn calculate_mao(arv: f64, rehab_cost: f64) -> f64 {
    calculate_mao_with(arv, rehab_cost, DEFAULT_MAO_ARV_PCT)
}

pub fn calculate_mao_with(arv: f64, rehab_cost: f64, arv_pct: f64) -> f64 {
    round2(arv * arv_pct - rehab_cost)
}
