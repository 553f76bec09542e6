//! Investment summary over a completed projection

use super::irr::{calculate_irr, npv_at_rate, payback_period, IrrSolution};
use crate::parameters::ParameterSet;
use crate::projection::YearRecord;
use serde::{Deserialize, Serialize};

/// Default discount rate for NPV
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.10;

/// Total committed funding by source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingStructure {
    pub bridge_loan: f64,
    #[serde(rename = "desenvolveSP")]
    pub desenvolve_sp: f64,
    pub prefeitura_subsidy: f64,
    pub total: f64,
}

impl FundingStructure {
    pub fn from_params(params: &ParameterSet) -> Self {
        Self {
            bridge_loan: params.bridge_loan,
            desenvolve_sp: params.desenvolve_sp,
            prefeitura_subsidy: params.prefeitura_subsidy,
            total: params.bridge_loan + params.desenvolve_sp + params.prefeitura_subsidy,
        }
    }
}

/// Headline metrics of a projection
///
/// Operating aggregates cover years 1..=N; year 0 is pre-launch. The
/// `year10*` fields hold the final projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    #[serde(rename = "year10Revenue")]
    pub year10_revenue: f64,
    #[serde(rename = "year10Ebitda")]
    pub year10_ebitda: f64,
    #[serde(rename = "year10Students")]
    pub year10_students: u32,
    pub cumulative_ebitda: f64,
    pub cumulative_fcf: f64,
    /// CAPEX over years 0..=N
    pub total_capex: f64,
    pub irr: f64,
    pub irr_converged: bool,
    pub npv: f64,
    pub payback_period: usize,
    /// Initial plus year-1 CAPEX
    pub total_investment: f64,
    pub funding_structure: FundingStructure,
    /// Mean EBITDA margin over years 1..=N
    pub average_ebitda_margin: f64,
}

/// Projection plus summary, as handed to dashboards and exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub projection: Vec<YearRecord>,
    pub summary: ProjectionSummary,
}

/// Cash flows used for IRR and payback
///
/// Free cash flow by year, with year 0 replaced by the initial CAPEX outflow.
pub fn return_cashflows(params: &ParameterSet, projection: &[YearRecord]) -> Vec<f64> {
    let mut cashflows: Vec<f64> = projection.iter().map(|y| y.free_cash_flow).collect();
    if let Some(first) = cashflows.first_mut() {
        *first = -params.initial_capex;
    }
    cashflows
}

/// Reduce a projection to its summary
///
/// NPV discounts the free cash flows as projected (year 0 included as
/// computed); IRR and payback use [`return_cashflows`].
pub fn summarize(
    params: &ParameterSet,
    projection: &[YearRecord],
    discount_rate: f64,
) -> ProjectionSummary {
    let cashflows = return_cashflows(params, projection);
    let irr: IrrSolution = calculate_irr(&cashflows);
    if !irr.converged {
        log::warn!(
            "IRR search stopped at {:.4} after {} iterations with NPV {:.2}",
            irr.rate,
            irr.iterations,
            irr.residual_npv
        );
    }

    let free_cash_flows: Vec<f64> = projection.iter().map(|y| y.free_cash_flow).collect();
    let npv = npv_at_rate(&free_cash_flows, discount_rate);

    let operating = projection.get(1..).unwrap_or(&[]);
    let cumulative_ebitda: f64 = operating.iter().map(|y| y.ebitda).sum();
    let cumulative_fcf: f64 = operating.iter().map(|y| y.free_cash_flow).sum();
    let average_ebitda_margin = if operating.is_empty() {
        0.0
    } else {
        operating.iter().map(|y| y.ebitda_margin).sum::<f64>() / operating.len() as f64
    };
    let total_capex: f64 = projection.iter().map(|y| y.capex).sum();

    let last = projection.last();

    ProjectionSummary {
        year10_revenue: last.map(|y| y.revenue.total).unwrap_or(0.0),
        year10_ebitda: last.map(|y| y.ebitda).unwrap_or(0.0),
        year10_students: last.map(|y| y.students).unwrap_or(0),
        cumulative_ebitda,
        cumulative_fcf,
        total_capex,
        irr: irr.rate,
        irr_converged: irr.converged,
        npv,
        payback_period: payback_period(&cashflows),
        total_investment: params.initial_capex + params.year1_capex,
        funding_structure: FundingStructure::from_params(params),
        average_ebitda_margin,
    }
}
