//! Projection engine: year calculator, projection builder and funding schedule

mod engine;
mod funding;
mod year;

pub use engine::{
    calculate_projection, calculate_year_data, ProjectionConfig, ProjectionEngine,
    CHURN_REPLACEMENT_RATE, CONTINGENCY_RATE, COST_INFLATION_RATE, DEFAULT_BASE_YEAR,
    DEFAULT_PROJECTION_YEARS, MAINTENANCE_CAPEX_RATE, TAX_RATE,
};
pub use funding::{
    debt_service, funding_sources, BRIDGE_INTEREST_RATE, DSP_AMORTIZATION_YEARS,
    DSP_GRACE_END_YEAR, DSP_INTEREST_RATE,
};
pub use year::{Costs, DebtService, FundingSources, Pricing, Revenue, YearRecord};
