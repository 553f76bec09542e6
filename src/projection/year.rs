//! Per-year output records

use serde::{Deserialize, Serialize};

/// Full financial detail for one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    // Timing
    pub year: u32,
    pub calendar_year: i32,

    /// Enrolled students, clamped to capacity
    pub students: u32,

    pub revenue: Revenue,
    pub costs: Costs,

    pub capex: f64,
    pub ebitda: f64,
    /// EBITDA over total revenue, 0 when there is no revenue
    pub ebitda_margin: f64,
    pub taxes: f64,
    pub net_income: f64,
    pub free_cash_flow: f64,

    /// Effective unit prices used this year
    pub pricing: Pricing,

    /// Funding inflows, present only in years that receive them
    pub funding_sources: Option<FundingSources>,
    /// Debt payments, present only in years that make them
    pub debt_service: Option<DebtService>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub tuition: f64,
    pub kits: f64,
    pub total: f64,
}

/// Operating cost lines (everything above EBITDA)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
    pub technology: f64,
    pub staff: f64,
    pub corporate: f64,
    pub facilities: f64,
    pub marketing: f64,
    pub teacher_training: f64,
    pub bad_debt: f64,
    pub payment_processing: f64,
    pub insurance: f64,
    pub legal: f64,
    pub contingency: f64,
    pub total: f64,
}

impl Costs {
    /// The eleven cost lines in reporting order
    pub fn lines(&self) -> [(&'static str, f64); 11] {
        [
            ("Technology", self.technology),
            ("Staff", self.staff),
            ("Corporate", self.corporate),
            ("Facilities", self.facilities),
            ("Marketing", self.marketing),
            ("Teacher Training", self.teacher_training),
            ("Bad Debt", self.bad_debt),
            ("Payment Processing", self.payment_processing),
            ("Insurance", self.insurance),
            ("Legal", self.legal),
            ("Contingency", self.contingency),
        ]
    }

    /// Sum of the eleven lines
    pub fn sum_of_lines(&self) -> f64 {
        self.lines().iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Monthly tuition
    pub tuition: f64,
    /// Annual kit price per student
    pub kit_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_loan: Option<f64>,
    #[serde(default, rename = "desenvolveSP", skip_serializing_if = "Option::is_none")]
    pub desenvolve_sp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefeitura_subsidy: Option<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_repayment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_interest: Option<f64>,
    /// Desenvolve SP interest during the grace period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsp_interest: Option<f64>,
    /// Desenvolve SP amortization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<f64>,
}

impl DebtService {
    /// Total cash paid to lenders this year
    pub fn total(&self) -> f64 {
        [
            self.bridge_repayment,
            self.bridge_interest,
            self.dsp_interest,
            self.principal,
            self.interest,
        ]
        .iter()
        .flatten()
        .sum()
    }
}

impl YearRecord {
    /// Revenue per enrolled student, 0 with no students
    pub fn revenue_per_student(&self) -> f64 {
        if self.students > 0 {
            self.revenue.total / self.students as f64
        } else {
            0.0
        }
    }

    /// Operating cost per enrolled student, 0 with no students
    pub fn cost_per_student(&self) -> f64 {
        if self.students > 0 {
            self.costs.total / self.students as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_service_total_skips_missing() {
        let ds = DebtService {
            principal: Some(2_000_000.0),
            interest: Some(840_000.0),
            ..DebtService::default()
        };
        assert_eq!(ds.total(), 2_840_000.0);
        assert_eq!(DebtService::default().total(), 0.0);
    }

    #[test]
    fn test_funding_sources_serialize_only_present_keys() {
        let funding = FundingSources {
            bridge_loan: Some(8_000_000.0),
            total: 8_000_000.0,
            ..FundingSources::default()
        };
        let json = serde_json::to_value(funding).unwrap();
        assert_eq!(json["bridgeLoan"], 8_000_000.0);
        assert!(json.get("desenvolveSP").is_none());
        assert!(json.get("prefeituraSubsidy").is_none());
    }
}
