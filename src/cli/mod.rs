//! Command-line parsing for the oscillatory-data curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    DEFAULT_BREAKPOINT_COUNT, DEFAULT_FIXED_SMOOTH_PENALTY, DEFAULT_NEAR_INTERP_PENALTY,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "osc", version, about = "Spline fitter for noisy oscillatory data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a two-column data file, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Fit a synthetic noisy sine dataset (no input file needed).
    Demo(DemoArgs),
}

/// Options shared by every pipeline invocation.
#[derive(Debug, Parser, Clone)]
pub struct PipelineArgs {
    /// Number of breakpoints for the primary spline fit (>= 2).
    #[arg(short = 'b', long, default_value_t = DEFAULT_BREAKPOINT_COUNT)]
    pub breakpoints: usize,

    /// Smoothing penalty for the near-interpolation fallback.
    #[arg(long, default_value_t = DEFAULT_NEAR_INTERP_PENALTY)]
    pub near_interp_penalty: f64,

    /// Smoothing parameter for the last-resort smoother.
    #[arg(long, default_value_t = DEFAULT_FIXED_SMOOTH_PENALTY)]
    pub smooth_penalty: f64,

    /// Show top-N worst-fitting samples.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-sample results (x, y, y_fit, residual) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fit report (method + KPIs + verdicts) to JSON.
    #[arg(long = "export-report")]
    pub export_report: Option<PathBuf>,
}

/// Options for fitting a data file.
#[derive(Debug, Parser)]
pub struct FitArgs {
    /// Input file: whitespace-delimited `x y` rows (`#` comments allowed).
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Options for the synthetic demo dataset.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Number of samples to generate.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower end of the x-range.
    #[arg(long, default_value_t = 0.0)]
    pub x_min: f64,

    /// Upper end of the x-range.
    #[arg(long, default_value_t = 10.0)]
    pub x_max: f64,

    /// Sine amplitude.
    #[arg(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Oscillation frequency (cycles per unit x).
    #[arg(long, default_value_t = 1.0 / std::f64::consts::TAU)]
    pub frequency: f64,

    /// Phase offset (radians).
    #[arg(long, default_value_t = 0.0)]
    pub phase: f64,

    /// Linear trend slope.
    #[arg(long, default_value_t = 0.0)]
    pub trend: f64,

    /// Standard deviation of the additive noise.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}
