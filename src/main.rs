use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use pretty_env_logger;
use std::path::PathBuf;
use std::process::ExitCode;
use wedge_model::config::Config;
use wedge_model::synthesis::ConvolutionMethod;
use wedge_model::{RockLayer, TuningWindow, WedgeModel, WedgeModelParams, WedgeModelParamsBuilder};

const VERSION: &'static str = env!("WEDGE_MODEL_VERSION");

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
#[command(version = VERSION)]
struct Cli {
    #[clap(subcommand)]
    mode: Modes,
    #[clap(long, global = true, help = "Write the tuning curve as CSV.")]
    curve_csv: Option<PathBuf>,
    #[clap(long, global = true, help = "Write the full seismogram as CSV.")]
    seismogram_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Modes {
    /// Evaluate a wedge model from command line parameters.
    Run(RunOpts),
    /// Evaluate a wedge model from a TOML configuration file.
    Config { path: PathBuf },
}

#[derive(Args, Debug)]
struct RunOpts {
    #[clap(long, value_parser = parse_layer, default_value = "4992,2.62",
           help = "Upper layer as velocity,density (m/s, g/cm3).")]
    upper: RockLayer,
    #[clap(long, value_parser = parse_layer, default_value = "4556,2.51",
           help = "Wedge layer as velocity,density (m/s, g/cm3).")]
    wedge: RockLayer,
    #[clap(long, value_parser = parse_layer, default_value = "5639,2.66",
           help = "Lower layer as velocity,density (m/s, g/cm3).")]
    lower: RockLayer,
    #[clap(long, default_value = "25.", help = "Ricker peak frequency in Hz.")]
    frequency: f64,
    #[clap(long, default_value = "200.")]
    max_thickness: f64,
    #[clap(long, default_value = "500")]
    num_traces: usize,
    #[clap(long, default_value = "0.5")]
    tmax: f64,
    #[clap(long, default_value = "0.001")]
    dt: f64,
    #[clap(long, default_value = "0.2", help = "Two-way time of the wedge top in s.")]
    top_time: f64,
    #[clap(long, default_value = "0.02", help = "Half width of the tuning window in s.")]
    half_window: f64,
    #[clap(long, requires = "window_end", help = "Explicit tuning window start in s.")]
    window_start: Option<f64>,
    #[clap(long, requires = "window_start", help = "Explicit tuning window end in s.")]
    window_end: Option<f64>,
    #[clap(long, default_value = "auto", help = "One of direct, fft or auto.")]
    method: ConvolutionMethod,
}

fn parse_layer(arg: &str) -> Result<RockLayer, String> {
    let (velocity, density) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected velocity,density but got '{}'", arg))?;
    let velocity: f64 = velocity
        .trim()
        .parse()
        .map_err(|e| format!("bad velocity '{}': {}", velocity, e))?;
    let density: f64 = density
        .trim()
        .parse()
        .map_err(|e| format!("bad density '{}': {}", density, e))?;
    Ok(RockLayer::new(velocity, density))
}

fn params_from_run_opts(opts: &RunOpts) -> Result<WedgeModelParams> {
    let mut builder = WedgeModelParamsBuilder::default();
    builder
        .upper(opts.upper)
        .wedge(opts.wedge)
        .lower(opts.lower)
        .frequency_hz(opts.frequency)
        .max_thickness_m(opts.max_thickness)
        .num_traces(opts.num_traces)
        .tmax(opts.tmax)
        .dt(opts.dt)
        .top_time_s(opts.top_time)
        .tuning_window_s(opts.half_window)
        .convolution(opts.method);
    if let (Some(start), Some(end)) = (opts.window_start, opts.window_end) {
        builder.tuning_window(TuningWindow::new(start, end)?);
    }
    Ok(builder.build()?)
}

fn write_outputs(cli: &Cli, model: &WedgeModel) -> Result<()> {
    if let Some(path) = &cli.curve_csv {
        model
            .write_tuning_curve_csv(path)
            .with_context(|| format!("writing tuning curve to {}", path.display()))?;
        info!("Tuning curve written to {}", path.display());
    }
    if let Some(path) = &cli.seismogram_csv {
        model
            .write_seismogram_csv(path)
            .with_context(|| format!("writing seismogram to {}", path.display()))?;
        info!("Seismogram written to {}", path.display());
    }
    Ok(())
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let params = match &cli.mode {
        Modes::Run(opts) => params_from_run_opts(opts)?,
        Modes::Config { path } => {
            let config = Config::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            println!("{}", config.summary());
            config.to_params()?
        }
    };
    let model = params.evaluate()?;
    println!("{}", model);
    write_outputs(&cli, &model)?;
    Ok(())
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
