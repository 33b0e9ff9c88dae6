use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Args, Command, FromArgMatches as _};

use crate::dataset::SeroprevalenceDataset;
use crate::error::SeirvError;
use crate::integrator::IntegrationMethod;
use crate::log::{info, set_log_level, set_module_filters, LevelFilter, LogDirectives};
use crate::parameters::{Parameters, DEFAULT_POPULATION};
use crate::report::{write_csv, write_trajectory_report, ReportOptions, DEFAULT_FILE_NAME};
use crate::simulator::simulate_with_progress;
use crate::state::SimulationState;
use crate::trajectory::Trajectory;

/// Default cli arguments for the qfever runner
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the trajectory report. Defaults to the current directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File name of the trajectory report
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,

    /// Replace an existing report file
    #[arg(long)]
    pub overwrite: bool,

    /// Write the trajectory CSV to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Enable logging at a level (e.g. `info`) and/or per module
    /// (e.g. `qfever::simulator=debug,qfever::integrator=trace`)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Model arguments. Each one overrides the corresponding value from `--config`.
#[derive(Args, Debug, Default)]
pub struct ModelArgs {
    /// Transmission rate (β)
    #[arg(long)]
    pub beta: Option<f64>,

    /// Progression rate from exposed to infectious (σ)
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Recovery rate (γ)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Vaccination rate (ν)
    #[arg(long)]
    pub nu: Option<f64>,

    /// Simulation horizon
    #[arg(long)]
    pub horizon: Option<f64>,

    /// Step size
    #[arg(long)]
    pub dt: Option<f64>,

    /// Integration method
    #[arg(long, value_enum)]
    pub method: Option<IntegrationMethod>,

    /// Herd size. The herd starts with only susceptible and infectious animals
    #[arg(long)]
    pub population: Option<u64>,

    /// Initially infectious animals (ignored with --dataset)
    #[arg(long)]
    pub initial_infected: Option<u64>,

    /// Seroprevalence CSV used to seed the initial infectious count
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Region to select from --dataset
    #[arg(long, requires = "dataset")]
    pub region: Option<String>,

    /// Species to select from --dataset
    #[arg(long, requires = "dataset")]
    pub species: Option<String>,

    /// List the regions and species in --dataset and exit
    #[arg(long, requires = "dataset")]
    pub list_regions: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub parameters: Option<Parameters>,
    pub trajectory: Option<Trajectory>,
    pub report_path: Option<PathBuf>,
}

fn create_qfever_cli() -> Command {
    let cli = Command::new("qfever")
        .about("SEIRV simulation of Q Fever spread among livestock")
        .version(env!("CARGO_PKG_VERSION"));
    let cli = BaseArgs::augment_args(cli);
    ModelArgs::augment_args(cli)
}

/// Parses the process arguments and runs a simulation.
///
/// # Errors
///
/// Returns an error if argument parsing, parameter loading, the simulation or writing the
/// report fails.
pub fn run_with_args() -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let matches = create_qfever_cli().get_matches();
    let base_args = BaseArgs::from_arg_matches(&matches)?;
    let model_args = ModelArgs::from_arg_matches(&matches)?;
    configure_logging(&base_args)?;
    Ok(run_with_args_internal(&base_args, &model_args)?)
}

/// Applies `--log-level` and `-v`. Without either, only warnings and errors are shown.
fn configure_logging(args: &BaseArgs) -> Result<(), SeirvError> {
    let verbosity = match args.verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };

    let directives = match &args.log_level {
        Some(directives) => LogDirectives::parse(directives)?,
        None => LogDirectives::default(),
    };

    let global = match (directives.level, verbosity) {
        (Some(a), Some(b)) => a.max(b),
        (a, b) => a.or(b).unwrap_or(LevelFilter::Warn),
    };
    set_log_level(global);

    if !directives.modules.is_empty() {
        let filters: Vec<(&String, LevelFilter)> = directives
            .modules
            .iter()
            .map(|(module, level)| (module, *level))
            .collect();
        set_module_filters(filters.as_slice());
        for (module, level) in &directives.modules {
            eprintln!("Logging enabled for {module} at level {level}");
        }
    }
    Ok(())
}

fn list_regions(dataset: &SeroprevalenceDataset) {
    for region in dataset.regions() {
        println!("{}: {}", region, dataset.species(&region).join(", "));
    }
}

/// Builds the run's `Parameters` from the config file, the dataset selection and the overrides.
fn resolve_parameters(
    args: &BaseArgs,
    model: &ModelArgs,
    dataset: Option<&SeroprevalenceDataset>,
) -> Result<Parameters, SeirvError> {
    let mut parameters = match &args.config {
        Some(path) => {
            info!("Loading parameters from: {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };

    if let Some(beta) = model.beta {
        parameters.rates.beta = beta;
    }
    if let Some(sigma) = model.sigma {
        parameters.rates.sigma = sigma;
    }
    if let Some(gamma) = model.gamma {
        parameters.rates.gamma = gamma;
    }
    if let Some(nu) = model.nu {
        parameters.rates.nu = nu;
    }
    if let Some(horizon) = model.horizon {
        parameters.horizon = horizon;
    }
    if let Some(dt) = model.dt {
        parameters.dt = dt;
    }
    if let Some(method) = model.method {
        parameters.method = method;
    }

    if let Some(dataset) = dataset {
        let (Some(region), Some(species)) = (&model.region, &model.species) else {
            return Err(SeirvError::InvalidParameter(
                "--region and --species are required with --dataset".to_string(),
            ));
        };
        let population = model.population.unwrap_or(DEFAULT_POPULATION);
        let prevalence = dataset.prevalence(region, species)?;
        parameters.initial = prevalence.initial_state(population)?;
        let message = format!(
            "Estimated prevalence for {region} / {species}: {:.2}% -> initial infectious: {}",
            prevalence.value() * 100.0,
            parameters.initial.i
        );
        // stdout may be carrying the trajectory CSV.
        if args.stdout {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    } else if model.population.is_some() || model.initial_infected.is_some() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let population = model
            .population
            .unwrap_or(parameters.population().round() as u64);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let infected = model
            .initial_infected
            .unwrap_or(parameters.initial.i.round() as u64);
        if infected > population {
            return Err(SeirvError::InvalidParameter(format!(
                "initial infected ({infected}) exceeds population ({population})"
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let (population, infected) = (population as f64, infected as f64);
        parameters.initial = SimulationState::new(population - infected, 0.0, infected, 0.0, 0.0);
    }

    Ok(parameters)
}

fn run_with_args_internal(args: &BaseArgs, model: &ModelArgs) -> Result<RunOutcome, SeirvError> {
    let dataset = match &model.dataset {
        Some(path) => Some(SeroprevalenceDataset::from_path(path)?),
        None => None,
    };

    if model.list_regions {
        if let Some(dataset) = &dataset {
            list_regions(dataset);
        }
        return Ok(RunOutcome {
            parameters: None,
            trajectory: None,
            report_path: None,
        });
    }

    let parameters = resolve_parameters(args, model, dataset.as_ref())?;
    let trajectory = run_simulation(&parameters, args.stdout || args.no_progress)?;
    let summary = trajectory.summary();

    let report_path = if args.stdout {
        let stdout = io::stdout();
        write_csv(&trajectory, stdout.lock())?;
        eprintln!("{summary}");
        None
    } else {
        let mut options = ReportOptions::new();
        if let Some(directory) = &args.output_dir {
            options.directory(directory.clone());
        }
        options.file_name(&args.file_name).overwrite(args.overwrite);
        let path = write_trajectory_report(&trajectory, &options)?;
        println!("{summary}");
        println!("report: {}", path.display());
        io::stdout().flush()?;
        Some(path)
    };

    Ok(RunOutcome {
        parameters: Some(parameters),
        trajectory: Some(trajectory),
        report_path,
    })
}

#[cfg(feature = "progress_bar")]
fn run_simulation(parameters: &Parameters, quiet: bool) -> Result<Trajectory, SeirvError> {
    use crate::numeric::step_count;
    use crate::progress::StepProgress;
    use crate::simulator::PROGRESS_CHUNK_STEPS;

    // Validate first so a bad run never draws a bar.
    parameters.validate()?;
    let total_steps = step_count(parameters.horizon, parameters.dt)?;
    if quiet || total_steps < PROGRESS_CHUNK_STEPS {
        return simulate_with_progress(parameters, |_, _| {});
    }
    let mut progress = StepProgress::start(total_steps);
    let trajectory = simulate_with_progress(parameters, |done, _| progress.update(done));
    progress.finish();
    trajectory
}

#[cfg(not(feature = "progress_bar"))]
fn run_simulation(parameters: &Parameters, _quiet: bool) -> Result<Trajectory, SeirvError> {
    simulate_with_progress(parameters, |_, _| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::DEFAULT_BETA;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> (BaseArgs, ModelArgs) {
        let matches = create_qfever_cli()
            .try_get_matches_from(std::iter::once("qfever").chain(args.iter().copied()))
            .unwrap();
        (
            BaseArgs::from_arg_matches(&matches).unwrap(),
            ModelArgs::from_arg_matches(&matches).unwrap(),
        )
    }

    #[test]
    fn parses_model_overrides() {
        let (base, model) = parse(&[
            "--beta", "0.5", "--dt", "0.25", "--method", "euler", "-vv", "--overwrite",
        ]);
        assert_eq!(model.beta, Some(0.5));
        assert_eq!(model.dt, Some(0.25));
        assert_eq!(model.method, Some(IntegrationMethod::Euler));
        assert_eq!(base.verbose, 2);
        assert!(base.overwrite);
        assert_eq!(base.file_name, DEFAULT_FILE_NAME);
    }

    #[test]
    fn region_requires_dataset() {
        let result = create_qfever_cli().try_get_matches_from(["qfever", "--region", "North"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let temp_dir = tempdir().unwrap();
        let config = temp_dir.path().join("params.json");
        fs::write(&config, r#"{"rates": {"gamma": 0.25}, "horizon": 20}"#).unwrap();

        let (base, model) = parse(&[
            "--config",
            config.to_str().unwrap(),
            "--horizon",
            "30",
            "--population",
            "500",
            "--initial-infected",
            "20",
        ]);
        let parameters = resolve_parameters(&base, &model, None).unwrap();
        assert_eq!(parameters.rates.beta, DEFAULT_BETA);
        assert_eq!(parameters.rates.gamma, 0.25);
        assert_eq!(parameters.horizon, 30.0);
        assert_eq!(
            parameters.initial,
            SimulationState::new(480.0, 0.0, 20.0, 0.0, 0.0)
        );
    }

    #[test]
    fn initial_infected_cannot_exceed_population() {
        let (base, model) = parse(&["--population", "10", "--initial-infected", "11"]);
        assert!(matches!(
            resolve_parameters(&base, &model, None),
            Err(SeirvError::InvalidParameter(_))
        ));
    }

    #[test]
    fn dataset_seeds_initial_state() {
        let dataset = SeroprevalenceDataset::from_reader(
            "region,species,number_examined,number_positive\nNorth,goat,200,10\n".as_bytes(),
        )
        .unwrap();
        let (base, model) = parse(&[
            "--dataset",
            "unused.csv",
            "--region",
            "North",
            "--species",
            "goat",
            "--population",
            "2000",
        ]);
        let parameters = resolve_parameters(&base, &model, Some(&dataset)).unwrap();
        assert_eq!(
            parameters.initial,
            SimulationState::new(1900.0, 0.0, 100.0, 0.0, 0.0)
        );

        let (base, model) = parse(&["--dataset", "unused.csv", "--region", "North"]);
        assert!(resolve_parameters(&base, &model, Some(&dataset)).is_err());
    }

    #[test]
    fn run_writes_report() {
        let temp_dir = tempdir().unwrap();
        let (base, model) = parse(&[
            "--output-dir",
            temp_dir.path().to_str().unwrap(),
            "--horizon",
            "5",
            "--no-progress",
        ]);
        let outcome = run_with_args_internal(&base, &model).unwrap();
        let path = outcome.report_path.unwrap();
        assert_eq!(path, temp_dir.path().join(DEFAULT_FILE_NAME));
        assert_eq!(outcome.trajectory.unwrap().len(), 6);
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 7);
    }

    #[test]
    fn invalid_override_fails_without_report() {
        let temp_dir = tempdir().unwrap();
        let (base, model) = parse(&[
            "--output-dir",
            temp_dir.path().to_str().unwrap(),
            "--dt=-1",
        ]);
        assert!(matches!(
            run_with_args_internal(&base, &model),
            Err(SeirvError::InvalidParameter(_))
        ));
        assert!(!temp_dir.path().join(DEFAULT_FILE_NAME).exists());
    }
}
