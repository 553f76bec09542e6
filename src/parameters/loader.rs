//! Load parameter sets (JSON) and yearly overrides (CSV)

use super::{ParameterSet, YearOverride, YearlyOverrides};
use crate::error::Result;
use csv::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a parameter set from a JSON file
///
/// Fields absent from the file take the realistic preset value, so a file
/// holding only the assumptions that differ from the base case is valid.
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<ParameterSet> {
    let file = File::open(path.as_ref())?;
    let params = load_parameters_from_reader(BufReader::new(file))?;
    log::debug!("Loaded parameters from {}", path.as_ref().display());
    Ok(params)
}

/// Load a parameter set from any JSON reader
pub fn load_parameters_from_reader<R: Read>(reader: R) -> Result<ParameterSet> {
    let params: ParameterSet = serde_json::from_reader(reader)?;
    params.validate()?;
    Ok(params)
}

/// One row of an overrides CSV; empty cells are not overridden
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Students")]
    students: Option<u32>,
    #[serde(rename = "ChurnRate")]
    churn_rate: Option<f64>,
    #[serde(rename = "Tuition")]
    tuition: Option<f64>,
    #[serde(rename = "KitCost")]
    kit_cost: Option<f64>,
    #[serde(rename = "Technology")]
    technology: Option<f64>,
    #[serde(rename = "StaffCosts")]
    staff_costs: Option<f64>,
    #[serde(rename = "CorporateOverhead")]
    corporate_overhead: Option<f64>,
    #[serde(rename = "FacilityCosts")]
    facility_costs: Option<f64>,
    #[serde(rename = "Marketing")]
    marketing: Option<f64>,
    #[serde(rename = "TeacherTraining")]
    teacher_training: Option<f64>,
    #[serde(rename = "Insurance")]
    insurance: Option<f64>,
    #[serde(rename = "Legal")]
    legal: Option<f64>,
    #[serde(rename = "Capex")]
    capex: Option<f64>,
}

impl CsvRow {
    fn into_override(self) -> (u32, YearOverride) {
        let record = YearOverride {
            students: self.students,
            churn_rate: self.churn_rate,
            tuition: self.tuition,
            kit_cost: self.kit_cost,
            technology: self.technology,
            staff_costs: self.staff_costs,
            corporate_overhead: self.corporate_overhead,
            facility_costs: self.facility_costs,
            marketing: self.marketing,
            teacher_training: self.teacher_training,
            insurance: self.insurance,
            legal: self.legal,
            capex: self.capex,
        };
        (self.year, record)
    }
}

/// Load yearly overrides from a CSV file
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<YearlyOverrides> {
    let file = File::open(path.as_ref())?;
    load_overrides_from_reader(file)
}

/// Load yearly overrides from any CSV reader
///
/// Only the `Year` column is required. Repeated years merge field-wise with
/// later rows winning.
pub fn load_overrides_from_reader<R: Read>(reader: R) -> Result<YearlyOverrides> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut overrides = YearlyOverrides::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let (year, record) = row.into_override();
        overrides.entry(year).or_default().merge(&record);
    }

    log::debug!("Loaded overrides for {} years", overrides.len());
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "tuitionMonthly": 2600,
            "yearlyOverrides": { "3": { "capex": 999 }, "5": {} }
        }"#;
        let params = load_parameters_from_reader(json.as_bytes()).unwrap();

        assert_eq!(params.tuition_monthly, 2600.0);
        assert_eq!(params.max_students, 1200);
        assert_eq!(params.override_for(3).unwrap().capex, Some(999.0));
        // Empty record is kept and distinguishable from a missing one
        assert!(params.override_for(5).unwrap().is_empty());
        assert!(params.override_for(4).is_none());
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        let json = r#"{ "marketingRate": 2.0 }"#;
        let result = load_parameters_from_reader(json.as_bytes());
        assert!(matches!(result, Err(ModelError::Configuration { .. })));
    }

    #[test]
    fn test_dashboard_editor_overrides_load() {
        // Key set written by the year-by-year editor, including the
        // `corporate` and `facilities` keys the model does not read
        let json = r#"{
            "yearlyOverrides": {
                "3": {
                    "students": 1100,
                    "tuition": 2600,
                    "kitCost": 1350,
                    "technology": 550000,
                    "staffCosts": 5600000,
                    "corporate": 2100000,
                    "facilities": 1600000,
                    "marketing": 1700000,
                    "teacherTraining": 300000,
                    "insurance": 110000,
                    "legal": 550000,
                    "capex": 999
                }
            }
        }"#;
        let params = load_parameters_from_reader(json.as_bytes()).unwrap();
        let record = params.override_for(3).unwrap();

        assert_eq!(record.students, Some(1100));
        assert_eq!(record.tuition, Some(2600.0));
        assert_eq!(record.kit_cost, Some(1350.0));
        assert_eq!(record.staff_costs, Some(5_600_000.0));
        assert_eq!(record.teacher_training, Some(300_000.0));
        assert_eq!(record.capex, Some(999.0));
        assert_eq!(record.corporate_overhead, None);
        assert_eq!(record.facility_costs, None);

        let year3 = crate::projection::calculate_year_data(&params, 3);
        let computed = crate::projection::calculate_year_data(&ParameterSet::default(), 3);
        assert_eq!(year3.students, 1100);
        assert_eq!(year3.capex, 999.0);
        assert_eq!(year3.costs.corporate, computed.costs.corporate);
        assert_eq!(year3.costs.facilities, computed.costs.facilities);
    }

    #[test]
    fn test_load_overrides_csv() {
        let data = "\
Year,Students,Tuition,Capex
2,700,,
3,,2500,999
3,1100,,
";
        let overrides = load_overrides_from_reader(data.as_bytes()).unwrap();

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[&2].students, Some(700));
        assert_eq!(overrides[&2].tuition, None);

        let year3 = &overrides[&3];
        assert_eq!(year3.students, Some(1100));
        assert_eq!(year3.tuition, Some(2500.0));
        assert_eq!(year3.capex, Some(999.0));
    }
}
