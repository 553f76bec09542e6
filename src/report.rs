//! CSV report tables for spreadsheet tools
//!
//! Each table matches one sheet of the dashboard export. Values are written
//! unformatted; currency and percentage display is left to the consumer.

use crate::analytics::ModelOutput;
use crate::error::Result;
use crate::projection::Costs;
use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::io::Write;

/// Which table to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Projections,
    Costs,
    Funding,
}

/// Write one report table
pub fn write_report<W: Write>(
    kind: ReportKind,
    output: &ModelOutput,
    scenario: &str,
    report_date: NaiveDate,
    writer: W,
) -> Result<()> {
    match kind {
        ReportKind::Summary => write_summary(output, scenario, report_date, writer),
        ReportKind::Projections => write_projections(output, writer),
        ReportKind::Costs => write_costs(output, writer),
        ReportKind::Funding => write_funding(output, writer),
    }
}

#[derive(Serialize)]
struct MetricRow {
    #[serde(rename = "Metric")]
    metric: &'static str,
    #[serde(rename = "Value")]
    value: String,
}

/// Headline metrics, one per row
pub fn write_summary<W: Write>(
    output: &ModelOutput,
    scenario: &str,
    report_date: NaiveDate,
    writer: W,
) -> Result<()> {
    let s = &output.summary;
    let rows = [
        ("Report Date", report_date.format("%Y-%m-%d").to_string()),
        ("Scenario", scenario.to_string()),
        ("Year 10 Revenue", s.year10_revenue.to_string()),
        ("Year 10 EBITDA", s.year10_ebitda.to_string()),
        ("Year 10 Students", s.year10_students.to_string()),
        ("IRR", s.irr.to_string()),
        ("IRR Converged", s.irr_converged.to_string()),
        ("NPV", s.npv.to_string()),
        ("Payback Period", s.payback_period.to_string()),
        ("Total Investment", s.total_investment.to_string()),
        ("Cumulative EBITDA", s.cumulative_ebitda.to_string()),
        ("Cumulative FCF", s.cumulative_fcf.to_string()),
        ("Total CAPEX", s.total_capex.to_string()),
        ("Average EBITDA Margin", s.average_ebitda_margin.to_string()),
    ];

    let mut csv = Writer::from_writer(writer);
    for (metric, value) in rows {
        csv.serialize(MetricRow { metric, value })?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ProjectionRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Calendar Year")]
    calendar_year: i32,
    #[serde(rename = "Students")]
    students: u32,
    #[serde(rename = "Tuition Revenue")]
    tuition_revenue: f64,
    #[serde(rename = "Kit Revenue")]
    kit_revenue: f64,
    #[serde(rename = "Total Revenue")]
    total_revenue: f64,
    #[serde(rename = "Total Costs")]
    total_costs: f64,
    #[serde(rename = "EBITDA")]
    ebitda: f64,
    #[serde(rename = "EBITDA Margin")]
    ebitda_margin: f64,
    #[serde(rename = "CAPEX")]
    capex: f64,
    #[serde(rename = "Net Income")]
    net_income: f64,
    #[serde(rename = "Free Cash Flow")]
    free_cash_flow: f64,
}

/// Operating years (1..=N), one row per year
pub fn write_projections<W: Write>(output: &ModelOutput, writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    for y in output.projection.iter().skip(1) {
        csv.serialize(ProjectionRow {
            year: y.year,
            calendar_year: y.calendar_year,
            students: y.students,
            tuition_revenue: y.revenue.tuition,
            kit_revenue: y.revenue.kits,
            total_revenue: y.revenue.total,
            total_costs: y.costs.total,
            ebitda: y.ebitda,
            ebitda_margin: y.ebitda_margin,
            capex: y.capex,
            net_income: y.net_income,
            free_cash_flow: y.free_cash_flow,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Cost lines by operating year
pub fn write_costs<W: Write>(output: &ModelOutput, writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);

    let mut header = vec!["Year", "Calendar Year"];
    header.extend(Costs::default().lines().iter().map(|(name, _)| *name));
    header.push("Total Costs");
    csv.write_record(&header)?;

    for y in output.projection.iter().skip(1) {
        let mut record = vec![y.year.to_string(), y.calendar_year.to_string()];
        record.extend(y.costs.lines().iter().map(|(_, v)| v.to_string()));
        record.push(y.costs.total.to_string());
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct FundingRow {
    #[serde(rename = "Source")]
    source: &'static str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Notes")]
    notes: &'static str,
}

/// Funding sources and their total
pub fn write_funding<W: Write>(output: &ModelOutput, writer: W) -> Result<()> {
    let f = &output.summary.funding_structure;
    let rows = [
        FundingRow { source: "Bridge Loan", amount: f.bridge_loan, notes: "Initial funding, repaid Year 1" },
        FundingRow { source: "Desenvolve SP", amount: f.desenvolve_sp, notes: "CAPEX financing" },
        FundingRow { source: "Prefeitura Subsidy", amount: f.prefeitura_subsidy, notes: "Government subsidy" },
        FundingRow { source: "Total Funding", amount: f.total, notes: "" },
    ];

    let mut csv = Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionEngine;

    fn render(kind: ReportKind) -> String {
        let output = ProjectionEngine::with_defaults().run();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut buf = Vec::new();
        write_report(kind, &output, "realistic", date, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_table() {
        let text = render(ReportKind::Summary);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Report Date,2026-10-18");
        assert_eq!(lines[2], "Scenario,realistic");
        assert!(text.contains("Total Investment,20000000\n"));
        assert!(text.contains("Payback Period,4\n"));
    }

    #[test]
    fn test_projection_table_skips_year_zero() {
        let text = render(ReportKind::Projections);
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Year");
        assert_eq!(&headers[11], "Free Cash Flow");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "2027");
        assert_eq!(&rows[0][2], "300");
        assert_eq!(rows[0][5].parse::<f64>().unwrap(), 8_640_000.0);
    }

    #[test]
    fn test_cost_table_columns() {
        let text = render(ReportKind::Costs);
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 14);
        assert_eq!(&headers[2], "Technology");
        assert_eq!(&headers[12], "Contingency");
        assert_eq!(&headers[13], "Total Costs");
        assert_eq!(reader.records().count(), 10);
    }

    #[test]
    fn test_cost_table_header_without_rows() {
        let mut output = ProjectionEngine::with_defaults().run();
        output.projection.clear();

        let mut buf = Vec::new();
        write_costs(&output, &mut buf).unwrap();
        let mut reader = csv::Reader::from_reader(buf.as_slice());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 14);
        assert_eq!(&headers[4], "Corporate");
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn test_funding_table() {
        let text = render(ReportKind::Funding);
        assert!(text.starts_with("Source,Amount,Notes\n"));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[3][0], "Total Funding");
        assert_eq!(rows[3][1].parse::<f64>().unwrap(), 20_000_000.0);
        assert_eq!(&rows[3][2], "");
    }
}
