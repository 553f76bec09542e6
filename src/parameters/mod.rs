//! Business assumptions for the flagship school projection
//!
//! A [`ParameterSet`] is the complete, immutable input of one projection run.
//! Per-year manual values live in a sparse map of [`YearOverride`] records.

mod presets;
pub mod loader;

pub use presets::Scenario;
pub use loader::{load_overrides, load_overrides_from_reader, load_parameters, load_parameters_from_reader};

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse map from year index to the manual values for that year
pub type YearlyOverrides = BTreeMap<u32, YearOverride>;

/// Complete set of business assumptions
///
/// Field names serialize in camelCase so saved parameter files from the
/// dashboard load unchanged. Fields missing from a file take the realistic
/// preset value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterSet {
    // Capacity
    pub max_students: u32,
    pub students_year1: u32,
    pub students_year2: u32,
    pub students_year3_plus: u32,
    /// Annual fraction of students lost (0-1)
    pub churn_rate: f64,

    // Pricing
    pub tuition_monthly: f64,
    pub tuition_increase_rate: f64,
    pub kit_cost_per_student: f64,

    // Technology
    pub technology_year1: f64,
    pub technology_years_after: f64,

    // CAPEX
    pub initial_capex: f64,
    pub year1_capex: f64,

    // Facilities
    pub base_facility_cost: f64,
    pub facility_inflation_rate: f64,

    // Staff
    pub staff_cost_per_student: f64,
    pub min_staff_cost: f64,
    pub corporate_overhead: f64,

    // Operating costs as fractions of revenue
    pub marketing_rate: f64,
    pub bad_debt_rate: f64,
    pub payment_processing_rate: f64,

    // Other costs
    pub teacher_training_base: f64,
    pub teacher_training_per_student: f64,
    pub insurance_base: f64,
    pub legal_compliance: f64,

    // Funding structure
    pub bridge_loan: f64,
    #[serde(rename = "desenvolveSP")]
    pub desenvolve_sp: f64,
    pub prefeitura_subsidy: f64,

    /// Manual per-year values, keyed by year index
    pub yearly_overrides: YearlyOverrides,
}

/// Manual values for a single year
///
/// Every field is optional. A present field replaces the computed value
/// verbatim, including zero. Keys the model does not read are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_costs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_overhead: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_costs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_training: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capex: Option<f64>,
}

impl YearOverride {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == YearOverride::default()
    }

    /// Merge another record into this one; fields set in `other` win
    pub fn merge(&mut self, other: &YearOverride) {
        fn take<T: Copy>(dst: &mut Option<T>, src: Option<T>) {
            if src.is_some() {
                *dst = src;
            }
        }
        take(&mut self.students, other.students);
        take(&mut self.churn_rate, other.churn_rate);
        take(&mut self.tuition, other.tuition);
        take(&mut self.kit_cost, other.kit_cost);
        take(&mut self.technology, other.technology);
        take(&mut self.staff_costs, other.staff_costs);
        take(&mut self.corporate_overhead, other.corporate_overhead);
        take(&mut self.facility_costs, other.facility_costs);
        take(&mut self.marketing, other.marketing);
        take(&mut self.teacher_training, other.teacher_training);
        take(&mut self.insurance, other.insurance);
        take(&mut self.legal, other.legal);
        take(&mut self.capex, other.capex);
    }

    /// Named monetary fields, for validation
    fn amounts(&self) -> [(&'static str, Option<f64>); 11] {
        [
            ("tuition", self.tuition),
            ("kitCost", self.kit_cost),
            ("technology", self.technology),
            ("staffCosts", self.staff_costs),
            ("corporateOverhead", self.corporate_overhead),
            ("facilityCosts", self.facility_costs),
            ("marketing", self.marketing),
            ("teacherTraining", self.teacher_training),
            ("insurance", self.insurance),
            ("legal", self.legal),
            ("capex", self.capex),
        ]
    }

    fn validate(&self, year: u32) -> Result<()> {
        if let Some(churn) = self.churn_rate {
            check_rate(&format!("yearlyOverrides[{}].churnRate", year), churn)?;
        }
        for (name, value) in self.amounts() {
            if let Some(v) = value {
                check_amount(&format!("yearlyOverrides[{}].{}", year, name), v)?;
            }
        }
        Ok(())
    }
}

impl Default for ParameterSet {
    /// The realistic scenario
    fn default() -> Self {
        Scenario::Realistic.parameters()
    }
}

impl ParameterSet {
    /// Override record for a year, if one exists
    pub fn override_for(&self, year: u32) -> Option<&YearOverride> {
        self.yearly_overrides.get(&year)
    }

    /// Build the parameters of `scenario`, keeping this set's yearly overrides
    pub fn with_preset(&self, scenario: Scenario) -> ParameterSet {
        ParameterSet {
            yearly_overrides: self.yearly_overrides.clone(),
            ..scenario.parameters()
        }
    }

    /// Return a copy with `overrides` merged field-wise into the existing map
    pub fn merge_overrides(&self, overrides: &YearlyOverrides) -> ParameterSet {
        let mut merged = self.clone();
        for (&year, record) in overrides {
            merged.yearly_overrides.entry(year).or_default().merge(record);
        }
        merged
    }

    /// Return a copy with the override record for `year` replaced
    pub fn with_override(&self, year: u32, record: YearOverride) -> ParameterSet {
        let mut updated = self.clone();
        updated.yearly_overrides.insert(year, record);
        updated
    }

    /// Check that every value is finite and within its allowed range
    ///
    /// Rates must lie in [0, 1], money amounts must be non-negative and
    /// `maxStudents` must be positive.
    pub fn validate(&self) -> Result<()> {
        if self.max_students == 0 {
            return Err(ModelError::configuration("maxStudents", "must be greater than zero"));
        }

        let rates = [
            ("churnRate", self.churn_rate),
            ("tuitionIncreaseRate", self.tuition_increase_rate),
            ("facilityInflationRate", self.facility_inflation_rate),
            ("marketingRate", self.marketing_rate),
            ("badDebtRate", self.bad_debt_rate),
            ("paymentProcessingRate", self.payment_processing_rate),
        ];
        for (name, value) in rates {
            check_rate(name, value)?;
        }

        let amounts = [
            ("tuitionMonthly", self.tuition_monthly),
            ("kitCostPerStudent", self.kit_cost_per_student),
            ("technologyYear1", self.technology_year1),
            ("technologyYearsAfter", self.technology_years_after),
            ("initialCapex", self.initial_capex),
            ("year1Capex", self.year1_capex),
            ("baseFacilityCost", self.base_facility_cost),
            ("staffCostPerStudent", self.staff_cost_per_student),
            ("minStaffCost", self.min_staff_cost),
            ("corporateOverhead", self.corporate_overhead),
            ("teacherTrainingBase", self.teacher_training_base),
            ("teacherTrainingPerStudent", self.teacher_training_per_student),
            ("insuranceBase", self.insurance_base),
            ("legalCompliance", self.legal_compliance),
            ("bridgeLoan", self.bridge_loan),
            ("desenvolveSP", self.desenvolve_sp),
            ("prefeituraSubsidy", self.prefeitura_subsidy),
        ];
        for (name, value) in amounts {
            check_amount(name, value)?;
        }

        for (&year, record) in &self.yearly_overrides {
            record.validate(year)?;
        }

        Ok(())
    }
}

fn check_rate(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ModelError::configuration(field, "must be a finite number"));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ModelError::configuration(field, format!("rate {} outside [0, 1]", value)));
    }
    Ok(())
}

fn check_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ModelError::configuration(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ModelError::configuration(field, format!("amount {} is negative", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ParameterSet::default().validate().is_ok());
        for scenario in Scenario::ALL {
            assert!(scenario.parameters().validate().is_ok(), "{:?} preset invalid", scenario);
        }
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let params = ParameterSet {
            churn_rate: 1.5,
            ..ParameterSet::default()
        };
        match params.validate() {
            Err(ModelError::Configuration { field, .. }) => assert_eq!(field, "churnRate"),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_and_negative_amounts() {
        let nan = ParameterSet {
            tuition_monthly: f64::NAN,
            ..ParameterSet::default()
        };
        assert!(nan.validate().is_err());

        let negative = ParameterSet {
            bridge_loan: -1.0,
            ..ParameterSet::default()
        };
        assert!(negative.validate().is_err());

        let no_capacity = ParameterSet {
            max_students: 0,
            ..ParameterSet::default()
        };
        assert!(no_capacity.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_override_values() {
        let params = ParameterSet::default().with_override(
            4,
            YearOverride {
                marketing: Some(f64::INFINITY),
                ..YearOverride::default()
            },
        );
        match params.validate() {
            Err(ModelError::Configuration { field, .. }) => {
                assert_eq!(field, "yearlyOverrides[4].marketing")
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_override_is_not_empty() {
        let record = YearOverride {
            capex: Some(0.0),
            ..YearOverride::default()
        };
        assert!(!record.is_empty());
        assert!(YearOverride::default().is_empty());
    }

    #[test]
    fn test_with_preset_keeps_overrides() {
        let record = YearOverride {
            students: Some(500),
            ..YearOverride::default()
        };
        let params = ParameterSet::default().with_override(2, record.clone());
        let switched = params.with_preset(Scenario::Optimistic);

        assert_eq!(switched.max_students, 1400);
        assert_eq!(switched.override_for(2), Some(&record));
    }

    #[test]
    fn test_merge_overrides_is_field_wise() {
        let params = ParameterSet::default().with_override(
            3,
            YearOverride {
                tuition: Some(2500.0),
                ..YearOverride::default()
            },
        );

        let mut incoming = YearlyOverrides::new();
        incoming.insert(
            3,
            YearOverride {
                capex: Some(999.0),
                ..YearOverride::default()
            },
        );
        let merged = params.merge_overrides(&incoming);

        let record = merged.override_for(3).unwrap();
        assert_eq!(record.tuition, Some(2500.0));
        assert_eq!(record.capex, Some(999.0));
        // original untouched
        assert_eq!(params.override_for(3).unwrap().capex, None);
    }

    #[test]
    fn test_json_round_trip_uses_camel_case_keys() {
        let params = ParameterSet::default().with_override(
            3,
            YearOverride {
                capex: Some(999.0),
                ..YearOverride::default()
            },
        );
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["desenvolveSP"], 10_000_000.0);
        assert_eq!(json["studentsYear3Plus"], 1200);
        assert_eq!(json["yearlyOverrides"]["3"]["capex"], 999.0);
        assert!(json["yearlyOverrides"]["3"].get("students").is_none());

        let back: ParameterSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}
