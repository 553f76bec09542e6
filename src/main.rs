//! Flagship school financial model CLI
//!
//! Command-line interface for running projections and comparing presets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flagship_model::parameters::{load_overrides, load_parameters};
use flagship_model::report::{self, ReportKind};
use flagship_model::{
    ModelOutput, ParameterSet, ProjectionConfig, ProjectionEngine, Scenario, ScenarioRunner,
    YearlyOverrides,
};
use std::io::{self, Write};
use std::path::PathBuf;

/// 10-year financial projection for the flagship school
#[derive(Parser)]
#[command(name = "flagship", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a projection and print it
    Project(ProjectArgs),
    /// Run every preset and compare headline metrics
    Compare(CompareArgs),
    /// Print a preset parameter set as JSON
    Preset {
        /// pessimistic, realistic or optimistic
        scenario: Scenario,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Preset to start from (pessimistic, realistic or optimistic)
    #[arg(long, default_value = "realistic")]
    scenario: Scenario,

    /// JSON parameter file (replaces the preset; missing fields use realistic values)
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(flatten)]
    horizon: HorizonArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table to write with --format csv
    #[arg(long, value_enum, default_value = "projections")]
    report: ReportArg,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    horizon: HorizonArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HorizonArgs {
    /// CSV of yearly overrides (Year column plus any override columns)
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Years to project after year 0
    #[arg(long, default_value_t = 10)]
    years: u32,

    /// Calendar year of year 0
    #[arg(long, default_value_t = 2026)]
    base_year: i32,

    /// Discount rate for NPV
    #[arg(long, default_value_t = 0.10)]
    discount_rate: f64,
}

impl HorizonArgs {
    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            years: self.years,
            base_year: self.base_year,
            discount_rate: self.discount_rate,
        }
    }

    fn overrides(&self) -> Result<YearlyOverrides> {
        match &self.overrides {
            Some(path) => load_overrides(path)
                .with_context(|| format!("reading overrides from {}", path.display())),
            None => Ok(YearlyOverrides::new()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    Summary,
    Projections,
    Costs,
    Funding,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Summary => ReportKind::Summary,
            ReportArg::Projections => ReportKind::Projections,
            ReportArg::Costs => ReportKind::Costs,
            ReportArg::Funding => ReportKind::Funding,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Project(args) => project(args),
        Commands::Compare(args) => compare(args),
        Commands::Preset { scenario } => {
            let params = scenario.parameters();
            println!("{}", serde_json::to_string_pretty(&params)?);
            Ok(())
        }
    }
}

fn project(args: ProjectArgs) -> Result<()> {
    let scenario = args.scenario;
    let (params, label) = match &args.params {
        Some(path) => {
            let params = load_parameters(path)
                .with_context(|| format!("reading parameters from {}", path.display()))?;
            (params, path.display().to_string())
        }
        None => (scenario.parameters(), scenario.name().to_lowercase()),
    };
    let params: ParameterSet = params.merge_overrides(&args.horizon.overrides()?);

    let engine = ProjectionEngine::new(params, args.horizon.config())
        .context("invalid projection inputs")?;
    let output = engine.run();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Table => write_projection(&mut io::stdout().lock(), &label, &output)?,
        OutputFormat::Csv => {
            let today = chrono::Local::now().date_naive();
            let stdout = io::stdout();
            report::write_report(args.report.into(), &output, &label, today, stdout.lock())?;
        }
    }
    Ok(())
}

fn compare(args: CompareArgs) -> Result<()> {
    let runner = ScenarioRunner::new()
        .with_overrides(args.horizon.overrides()?)
        .with_config(args.horizon.config());
    let outcomes = runner.run_all().context("running presets")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!(
        "{:<12} {:>16} {:>16} {:>9} {:>8} {:>16} {:>8}",
        "Scenario", "Final Revenue", "Final EBITDA", "Students", "IRR", "NPV", "Payback"
    );
    println!("{}", "-".repeat(91));
    for outcome in &outcomes {
        let s = &outcome.output.summary;
        println!(
            "{:<12} {:>16.0} {:>16.0} {:>9} {:>7.1}%{} {:>16.0} {:>8}",
            outcome.scenario.name(),
            s.year10_revenue,
            s.year10_ebitda,
            s.year10_students,
            s.irr * 100.0,
            if s.irr_converged { " " } else { "*" },
            s.npv,
            s.payback_period,
        );
    }
    if outcomes.iter().any(|o| !o.output.summary.irr_converged) {
        println!("\n* IRR search did not converge");
    }
    Ok(())
}

fn write_projection<W: Write>(out: &mut W, label: &str, output: &ModelOutput) -> io::Result<()> {
    writeln!(out, "Flagship School Projection ({})", label)?;
    writeln!(out, "{}", "=".repeat(40))?;
    writeln!(out)?;

    writeln!(
        out,
        "{:>4} {:>6} {:>8} {:>14} {:>14} {:>14} {:>8} {:>12} {:>14}",
        "Year", "Cal", "Students", "Revenue", "Costs", "EBITDA", "Margin", "CAPEX", "FCF"
    )?;
    writeln!(out, "{}", "-".repeat(104))?;
    for y in &output.projection {
        writeln!(
            out,
            "{:>4} {:>6} {:>8} {:>14.0} {:>14.0} {:>14.0} {:>7.1}% {:>12.0} {:>14.0}",
            y.year,
            y.calendar_year,
            y.students,
            y.revenue.total,
            y.costs.total,
            y.ebitda,
            y.ebitda_margin * 100.0,
            y.capex,
            y.free_cash_flow,
        )?;
    }

    let s = &output.summary;
    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Final Year Revenue:  R$ {:.0}", s.year10_revenue)?;
    writeln!(out, "  Final Year EBITDA:   R$ {:.0}", s.year10_ebitda)?;
    writeln!(out, "  Final Year Students: {}", s.year10_students)?;
    writeln!(out, "  Cumulative EBITDA:   R$ {:.0}", s.cumulative_ebitda)?;
    writeln!(out, "  Cumulative FCF:      R$ {:.0}", s.cumulative_fcf)?;
    writeln!(out, "  Total CAPEX:         R$ {:.0}", s.total_capex)?;
    writeln!(
        out,
        "  IRR:                 {:.2}%{}",
        s.irr * 100.0,
        if s.irr_converged { "" } else { " (did not converge)" }
    )?;
    writeln!(out, "  NPV:                 R$ {:.0}", s.npv)?;
    writeln!(out, "  Payback Period:      year {}", s.payback_period)?;
    writeln!(out, "  Total Investment:    R$ {:.0}", s.total_investment)?;

    let f = &s.funding_structure;
    writeln!(out, "\nFunding Structure:")?;
    writeln!(out, "  Bridge Loan:         R$ {:.0}", f.bridge_loan)?;
    writeln!(out, "  Desenvolve SP:       R$ {:.0}", f.desenvolve_sp)?;
    writeln!(out, "  Prefeitura Subsidy:  R$ {:.0}", f.prefeitura_subsidy)?;
    writeln!(out, "  Total:               R$ {:.0}", f.total)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parsed_by_name() {
        let cli = Cli::try_parse_from(["flagship", "project", "--scenario", "Optimistic"]).unwrap();
        match cli.command {
            Commands::Project(args) => assert_eq!(args.scenario, Scenario::Optimistic),
            _ => panic!("expected project command"),
        }

        let cli = Cli::try_parse_from(["flagship", "preset", "pessimistic"]).unwrap();
        assert!(matches!(cli.command, Commands::Preset { scenario: Scenario::Pessimistic }));
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let err = Cli::try_parse_from(["flagship", "preset", "base"]).err().unwrap();
        assert!(err.to_string().contains("Unknown scenario: base"));
    }
}
