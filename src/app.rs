//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads the input file (or generates the demo dataset)
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DemoArgs, FitArgs, PipelineArgs};
use crate::data::{SampleSpec, generate_sample};
use crate::domain::{FitConfig, QualityThresholds, ReportFile};
use crate::error::AppError;
use crate::io::{read_xy_file, write_report_json, write_results_csv};

pub mod pipeline;

/// Entry point for the `osc` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.pipeline);
    let series = read_xy_file(&args.input)?;

    // Row errors are warnings, not failures: the file was readable and at
    // least one row was usable, or ingest would have errored already.
    for err in &series.row_errors {
        eprintln!("warning: {} line {}: {}", args.input.display(), err.line, err.message);
    }
    println!(
        "Loaded {} of {} data rows from '{}'.",
        series.pairs.len(),
        series.rows_read,
        args.input.display()
    );

    run_and_render(&series.pairs, &config)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.pipeline);
    let spec = SampleSpec {
        count: args.count,
        seed: args.seed,
        x_min: args.x_min,
        x_max: args.x_max,
        amplitude: args.amplitude,
        frequency: args.frequency,
        phase: args.phase,
        trend: args.trend,
        noise_sigma: args.noise,
    };
    let pairs = generate_sample(&spec)?;

    run_and_render(&pairs, &config)
}

fn run_and_render(raw: &[(f64, f64)], config: &FitConfig) -> Result<(), AppError> {
    let run = pipeline::run_pipeline(raw, config)?;

    println!(
        "{}",
        crate::report::format_run_summary(
            &run.stats,
            &run.breakpoints,
            &run.fit,
            &run.kpis,
            &run.quality,
        )
    );

    let worst = crate::report::rank_worst(&run.residuals, config.top_n);
    println!(
        "{}",
        crate::report::format_worst_points(&run.residuals, &worst)
    );

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.residuals,
            config.plot_width,
            config.plot_height,
            Some(&worst),
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_report {
        let report = ReportFile {
            tool: "osc".to_string(),
            method: run.fit.method,
            stats: run.stats.clone(),
            breakpoint_count: run.breakpoints.count(),
            kpis: run.kpis.clone(),
            quality: run.quality.clone(),
        };
        write_report_json(path, &report)?;
    }

    Ok(())
}

pub fn fit_config_from_args(args: &PipelineArgs) -> FitConfig {
    FitConfig {
        breakpoint_count: args.breakpoints,
        near_interp_penalty: args.near_interp_penalty,
        fixed_smooth_penalty: args.smooth_penalty,
        thresholds: QualityThresholds::default(),
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_report: args.export_report.clone(),
    }
}
