//! Funding inflows and debt service by year
//!
//! Fixed schedule: bridge loan in year 0, Desenvolve SP and the Prefeitura
//! subsidy in year 1 (which also repays the bridge), Desenvolve SP interest-only
//! through year 6, then straight-line amortization from year 7.

use super::year::{DebtService, FundingSources};
use crate::parameters::ParameterSet;

/// Annual interest on the bridge loan
pub const BRIDGE_INTEREST_RATE: f64 = 0.14;

/// Annual interest on the Desenvolve SP facility
pub const DSP_INTEREST_RATE: f64 = 0.084;

/// Last interest-only year of the Desenvolve SP facility
pub const DSP_GRACE_END_YEAR: u32 = 6;

/// Desenvolve SP amortization term in years
pub const DSP_AMORTIZATION_YEARS: u32 = 5;

/// Funding inflows received in `year`
pub fn funding_sources(params: &ParameterSet, year: u32) -> Option<FundingSources> {
    match year {
        0 => Some(FundingSources {
            bridge_loan: Some(params.bridge_loan),
            total: params.bridge_loan,
            ..FundingSources::default()
        }),
        1 => Some(FundingSources {
            desenvolve_sp: Some(params.desenvolve_sp),
            prefeitura_subsidy: Some(params.prefeitura_subsidy),
            total: params.desenvolve_sp + params.prefeitura_subsidy,
            ..FundingSources::default()
        }),
        _ => None,
    }
}

/// Debt payments made in `year`
pub fn debt_service(params: &ParameterSet, year: u32) -> Option<DebtService> {
    match year {
        0 => None,
        1 => Some(DebtService {
            bridge_repayment: Some(params.bridge_loan),
            bridge_interest: Some(params.bridge_loan * BRIDGE_INTEREST_RATE),
            ..DebtService::default()
        }),
        2..=DSP_GRACE_END_YEAR => Some(DebtService {
            dsp_interest: Some(params.desenvolve_sp * DSP_INTEREST_RATE),
            ..DebtService::default()
        }),
        _ => {
            let installment = params.desenvolve_sp / DSP_AMORTIZATION_YEARS as f64;
            let paid_years = (year - DSP_GRACE_END_YEAR - 1) as f64;
            let remaining_principal = params.desenvolve_sp - paid_years * installment;
            if remaining_principal > 0.0 {
                Some(DebtService {
                    principal: Some(installment),
                    interest: Some(remaining_principal * DSP_INTEREST_RATE),
                    ..DebtService::default()
                })
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflows_only_in_first_two_years() {
        let params = ParameterSet::default();

        let y0 = funding_sources(&params, 0).unwrap();
        assert_eq!(y0.bridge_loan, Some(8_000_000.0));
        assert_eq!(y0.total, 8_000_000.0);

        let y1 = funding_sources(&params, 1).unwrap();
        assert_eq!(y1.bridge_loan, None);
        assert_eq!(y1.total, 12_000_000.0);

        for year in 2..=10 {
            assert!(funding_sources(&params, year).is_none());
        }
    }

    #[test]
    fn test_bridge_repaid_in_year_one() {
        let params = ParameterSet::default();
        assert!(debt_service(&params, 0).is_none());

        let y1 = debt_service(&params, 1).unwrap();
        assert_eq!(y1.bridge_repayment, Some(8_000_000.0));
        assert!((y1.bridge_interest.unwrap() - 1_120_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_grace_period_interest_only() {
        let params = ParameterSet::default();
        for year in 2..=6 {
            let ds = debt_service(&params, year).unwrap();
            assert!((ds.dsp_interest.unwrap() - 840_000.0).abs() < 1e-6);
            assert_eq!(ds.principal, None);
        }
    }

    #[test]
    fn test_amortization_runs_off() {
        let params = ParameterSet::default();

        // Remaining principal 10M, 8M, 6M, 4M, 2M in years 7..11
        let expected_interest = [840_000.0, 672_000.0, 504_000.0, 336_000.0, 168_000.0];
        for (i, interest) in expected_interest.iter().enumerate() {
            let ds = debt_service(&params, 7 + i as u32).unwrap();
            assert_eq!(ds.principal, Some(2_000_000.0));
            assert!((ds.interest.unwrap() - interest).abs() < 1e-6);
        }

        assert!(debt_service(&params, 12).is_none());
        assert!(debt_service(&params, 15).is_none());
    }
}
