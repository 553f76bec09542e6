//! Investment analytics: IRR, NPV, payback and projection summaries

mod irr;
mod summary;

pub use irr::{
    calculate_irr, npv_at_rate, payback_period, IrrSolution, IRR_INITIAL_GUESS,
    IRR_LOWER_BOUND, IRR_MAX_ITERATIONS, IRR_NPV_TOLERANCE, IRR_UPPER_BOUND, MIN_PAYBACK_YEARS,
};
pub use summary::{
    return_cashflows, summarize, FundingStructure, ModelOutput, ProjectionSummary,
    DEFAULT_DISCOUNT_RATE,
};
