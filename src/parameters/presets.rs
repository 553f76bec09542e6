//! Named scenario presets
//!
//! Realistic is the base case. Pessimistic and optimistic adjust a subset of
//! its assumptions and inherit everything else.

use super::{ParameterSet, YearlyOverrides};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scenario preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Pessimistic,
    Realistic,
    Optimistic,
}

impl Scenario {
    /// All presets, in display order
    pub const ALL: [Scenario; 3] = [Scenario::Pessimistic, Scenario::Realistic, Scenario::Optimistic];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Pessimistic => "Pessimistic",
            Scenario::Realistic => "Realistic",
            Scenario::Optimistic => "Optimistic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Pessimistic => "Conservative growth, higher costs, slower ramp-up",
            Scenario::Realistic => "Expected scenario with moderate growth",
            Scenario::Optimistic => "Strong growth, efficient operations, faster ramp-up",
        }
    }

    /// Complete parameter set for this preset, with no yearly overrides
    pub fn parameters(&self) -> ParameterSet {
        match self {
            Scenario::Realistic => realistic(),
            Scenario::Pessimistic => ParameterSet {
                max_students: 1000,
                students_year1: 250,
                students_year2: 600,
                students_year3_plus: 1000,
                tuition_monthly: 2100.0,
                tuition_increase_rate: 0.05,
                kit_cost_per_student: 1000.0,
                churn_rate: 0.07,
                technology_year1: 5_500_000.0,
                technology_years_after: 600_000.0,
                initial_capex: 17_000_000.0,
                year1_capex: 5_500_000.0,
                base_facility_cost: 1_700_000.0,
                staff_cost_per_student: 4800.0,
                min_staff_cost: 5_500_000.0,
                corporate_overhead: 2_300_000.0,
                marketing_rate: 0.06,
                bad_debt_rate: 0.03,
                bridge_loan: 9_000_000.0,
                desenvolve_sp: 11_000_000.0,
                prefeitura_subsidy: 2_500_000.0,
                ..realistic()
            },
            Scenario::Optimistic => ParameterSet {
                max_students: 1400,
                students_year1: 400,
                students_year2: 900,
                students_year3_plus: 1400,
                tuition_monthly: 2500.0,
                tuition_increase_rate: 0.07,
                kit_cost_per_student: 1400.0,
                churn_rate: 0.03,
                technology_year1: 4_500_000.0,
                technology_years_after: 400_000.0,
                initial_capex: 14_000_000.0,
                year1_capex: 4_500_000.0,
                base_facility_cost: 1_400_000.0,
                staff_cost_per_student: 4000.0,
                min_staff_cost: 4_500_000.0,
                corporate_overhead: 1_800_000.0,
                marketing_rate: 0.04,
                bad_debt_rate: 0.015,
                bridge_loan: 7_000_000.0,
                desenvolve_sp: 9_000_000.0,
                prefeitura_subsidy: 2_500_000.0,
                ..realistic()
            },
        }
    }
}

/// Base case: 1,200 seats, R$20M CAPEX funded by bridge, Desenvolve SP and subsidy
fn realistic() -> ParameterSet {
    ParameterSet {
        // Full capacity: 30 students/class, morning and afternoon shifts
        max_students: 1200,
        students_year1: 300,
        students_year2: 750,
        students_year3_plus: 1200,
        churn_rate: 0.05,

        tuition_monthly: 2300.0,
        tuition_increase_rate: 0.06,
        kit_cost_per_student: 1200.0,

        technology_year1: 5_000_000.0,
        technology_years_after: 500_000.0,

        // Building and renovation in year 0, equipment and finishing in year 1
        initial_capex: 15_000_000.0,
        year1_capex: 5_000_000.0,

        base_facility_cost: 1_500_000.0,
        facility_inflation_rate: 0.05,

        staff_cost_per_student: 4400.0,
        min_staff_cost: 5_000_000.0,
        corporate_overhead: 2_000_000.0,

        marketing_rate: 0.05,
        bad_debt_rate: 0.02,
        payment_processing_rate: 0.025,

        teacher_training_base: 200_000.0,
        teacher_training_per_student: 250.0,
        insurance_base: 100_000.0,
        legal_compliance: 500_000.0,

        bridge_loan: 8_000_000.0,
        desenvolve_sp: 10_000_000.0,
        prefeitura_subsidy: 2_000_000.0,

        yearly_overrides: YearlyOverrides::new(),
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(Scenario::Pessimistic),
            "realistic" => Ok(Scenario::Realistic),
            "optimistic" => Ok(Scenario::Optimistic),
            _ => Err(ModelError::UnknownScenario(s.to_string())),
        }
    }
}
