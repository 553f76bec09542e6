//! Core projection engine: year calculator and projection builder

use crate::analytics::{self, ModelOutput};
use crate::error::{ModelError, Result};
use crate::parameters::{ParameterSet, YearOverride};
use super::funding;
use super::year::{Costs, Pricing, Revenue, YearRecord};
use std::ops::Bound;

/// Default projection horizon in years (after year 0)
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

/// Calendar year of year 0
pub const DEFAULT_BASE_YEAR: i32 = 2026;

/// Growth applied to technology, staff, overhead, training, insurance and legal
pub const COST_INFLATION_RATE: f64 = 0.05;

/// Share of churned students replaced by new enrollment
pub const CHURN_REPLACEMENT_RATE: f64 = 0.95;

/// Contingency as a fraction of revenue
pub const CONTINGENCY_RATE: f64 = 0.02;

/// Maintenance CAPEX from year 2, as a fraction of revenue
pub const MAINTENANCE_CAPEX_RATE: f64 = 0.02;

/// Flat corporate tax rate (IRPJ + CSLL)
pub const TAX_RATE: f64 = 0.34;

/// Year-0 corporate overhead as a fraction of the annual figure (pre-launch)
pub const PRE_LAUNCH_OVERHEAD_FACTOR: f64 = 0.5;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of years after year 0
    pub years: u32,

    /// Calendar year of year 0
    pub base_year: i32,

    /// Discount rate for NPV
    pub discount_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            years: DEFAULT_PROJECTION_YEARS,
            base_year: DEFAULT_BASE_YEAR,
            discount_rate: analytics::DEFAULT_DISCOUNT_RATE,
        }
    }
}

/// Main projection engine
///
/// Owns a validated parameter set. Changing assumptions means building a new
/// engine, so a projection never observes a half-edited parameter set.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: ParameterSet,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Validate `params` and create an engine
    pub fn new(params: ParameterSet, config: ProjectionConfig) -> Result<Self> {
        params.validate()?;

        if config.years == 0 {
            return Err(ModelError::configuration("years", "must project at least one year"));
        }
        let last_year = i32::try_from(config.years)
            .ok()
            .and_then(|years| config.base_year.checked_add(years));
        if last_year.is_none() {
            return Err(ModelError::configuration(
                "years",
                format!(
                    "horizon of {} years from {} overflows the calendar",
                    config.years, config.base_year
                ),
            ));
        }

        let beyond_horizon = (Bound::Excluded(config.years), Bound::Unbounded);
        if let Some((&year, _)) = params.yearly_overrides.range(beyond_horizon).next() {
            return Err(ModelError::configuration(
                format!("yearlyOverrides[{}]", year),
                format!("year outside projection horizon 0..={}", config.years),
            ));
        }
        if !config.discount_rate.is_finite() || config.discount_rate <= -1.0 {
            return Err(ModelError::configuration(
                "discountRate",
                format!("{} is not a usable discount rate", config.discount_rate),
            ));
        }

        Ok(Self { params, config })
    }

    /// Engine over the realistic preset with default config
    pub fn with_defaults() -> Self {
        Self {
            params: ParameterSet::default(),
            config: ProjectionConfig::default(),
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Calculate a single year
    pub fn year(&self, year: u32) -> YearRecord {
        let mut record = calculate_year_data(&self.params, year);
        record.calendar_year = self.config.base_year + year as i32;
        record
    }

    /// Calculate years 0..=config.years in order
    pub fn project(&self) -> Vec<YearRecord> {
        let projection: Vec<YearRecord> = (0..=self.config.years).map(|y| self.year(y)).collect();
        log::info!(
            "Projected {} years ({} overridden)",
            projection.len(),
            self.params.yearly_overrides.len()
        );
        projection
    }

    /// Project and summarize
    pub fn run(&self) -> ModelOutput {
        let projection = self.project();
        let summary = analytics::summarize(&self.params, &projection, self.config.discount_rate);
        log::info!(
            "IRR {:.2}% NPV {:.2} payback year {}",
            summary.irr * 100.0,
            summary.npv,
            summary.payback_period
        );
        ModelOutput { projection, summary }
    }
}

/// Calculate years 0..=years with the default base year
pub fn calculate_projection(params: &ParameterSet, years: u32) -> Vec<YearRecord> {
    (0..=years).map(|year| calculate_year_data(params, year)).collect()
}

/// Calculate the full financial detail of one year
///
/// Pure: the result depends only on `params` and `year`. Any value present in
/// the year's override record is used verbatim and its derivation skipped.
pub fn calculate_year_data(params: &ParameterSet, year: u32) -> YearRecord {
    let empty = YearOverride::default();
    let ov = params.override_for(year).unwrap_or(&empty);

    let students = enrolled_students(params, ov, year);
    let n = students as f64;

    // Year 0 and year 1 are both at launch prices
    let inflation_years = year.saturating_sub(1) as i32;
    let price_growth = (1.0 + params.tuition_increase_rate).powi(inflation_years);
    let cost_growth = (1.0 + COST_INFLATION_RATE).powi(inflation_years);

    let pricing = Pricing {
        tuition: ov.tuition.unwrap_or(params.tuition_monthly * price_growth),
        kit_cost: ov.kit_cost.unwrap_or(params.kit_cost_per_student * price_growth),
    };

    let tuition_revenue = n * pricing.tuition * 12.0;
    let kit_revenue = n * pricing.kit_cost;
    let revenue = Revenue {
        tuition: tuition_revenue,
        kits: kit_revenue,
        total: tuition_revenue + kit_revenue,
    };
    let sales = revenue.total;

    let technology = ov.technology.unwrap_or_else(|| match year {
        0 => 0.0,
        1 => params.technology_year1,
        _ => params.technology_years_after * cost_growth,
    });

    let staff = ov.staff_costs.unwrap_or_else(|| match year {
        0 => 0.0,
        _ => params.min_staff_cost.max(n * params.staff_cost_per_student) * cost_growth,
    });

    let corporate = ov.corporate_overhead.unwrap_or_else(|| match year {
        0 => params.corporate_overhead * PRE_LAUNCH_OVERHEAD_FACTOR,
        _ => params.corporate_overhead * cost_growth,
    });

    let facilities = ov.facility_costs.unwrap_or_else(|| match year {
        0 => 0.0,
        _ => {
            params.base_facility_cost
                * (1.0 + params.facility_inflation_rate).powi(inflation_years)
        }
    });

    let marketing = ov.marketing.unwrap_or(sales * params.marketing_rate);

    let teacher_training = ov.teacher_training.unwrap_or_else(|| match year {
        0 => 0.0,
        _ => {
            params.teacher_training_base.max(n * params.teacher_training_per_student)
                * cost_growth
        }
    });

    let mut costs = Costs {
        technology,
        staff,
        corporate,
        facilities,
        marketing,
        teacher_training,
        bad_debt: sales * params.bad_debt_rate,
        payment_processing: sales * params.payment_processing_rate,
        insurance: ov.insurance.unwrap_or(params.insurance_base * cost_growth),
        legal: ov.legal.unwrap_or(params.legal_compliance * cost_growth),
        contingency: sales * CONTINGENCY_RATE,
        total: 0.0,
    };
    costs.total = costs.sum_of_lines();

    let ebitda = sales - costs.total;
    let ebitda_margin = if sales > 0.0 { ebitda / sales } else { 0.0 };

    let capex = ov.capex.unwrap_or_else(|| match year {
        0 => params.initial_capex,
        1 => params.year1_capex,
        _ => sales * MAINTENANCE_CAPEX_RATE,
    });

    // No loss carryforward
    let taxes = ebitda.max(0.0) * TAX_RATE;
    let net_income = ebitda - taxes;
    let free_cash_flow = net_income - capex;

    log::debug!(
        "Year {}: students={} revenue={:.2} ebitda={:.2} fcf={:.2}",
        year,
        students,
        sales,
        ebitda,
        free_cash_flow
    );

    YearRecord {
        year,
        calendar_year: DEFAULT_BASE_YEAR + year as i32,
        students,
        revenue,
        costs,
        capex,
        ebitda,
        ebitda_margin,
        taxes,
        net_income,
        free_cash_flow,
        pricing,
        funding_sources: funding::funding_sources(params, year),
        debt_service: funding::debt_service(params, year),
    }
}

/// Enrollment for `year`, after churn and the capacity clamp
///
/// Churn is applied to the tier's base enrollment, not to the prior year's
/// count. Of the churned students, 95% are replaced.
fn enrolled_students(params: &ParameterSet, ov: &YearOverride, year: u32) -> u32 {
    let students = match ov.students {
        Some(s) => s,
        None => {
            let base = match year {
                0 => 0,
                1 => params.students_year1,
                2 => params.students_year2,
                _ => params.students_year3_plus,
            };
            if year > 1 {
                let churn = ov.churn_rate.unwrap_or(params.churn_rate);
                let base = base as f64;
                (base * (1.0 - churn) + base * churn * CHURN_REPLACEMENT_RATE).round() as u32
            } else {
                base
            }
        }
    };
    students.min(params.max_students)
}
