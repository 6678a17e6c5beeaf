use anyhow::{anyhow, Context, Result};
use bandeig::{
    eigen_print, error, io as matrix_io, qr_eigs_band_with, reference_eigenvalues,
    tridiagonalize_band, BandMatrix, EigenError, EigenResults, ShiftStrategy, SolverConfig,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use termcolor::ColorChoice;

/// bandeig: eigenvalues of real symmetric band matrices
#[derive(Parser, Debug)]
#[command(
    name = "bandeig",
    about = "Reduce symmetric band matrices to tridiagonal form and compute their eigenvalues by implicit QR",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the eigenvalues of a matrix stored as headerless CSV
    Solve(SolveArgs),
    /// Run the built-in 5x5 bandwidth-2 example
    Demo(DemoArgs),
    /// Generate a random symmetric band matrix and solve it
    Random(RandomArgs),
}

#[derive(Args, Debug, Clone)]
struct SolverArgs {
    /// Off-diagonal entries below this magnitude are treated as zero
    #[arg(long, default_value_t = bandeig::solver::DEFAULT_EPS)]
    eps: f64,
    /// Maximum number of QR sweeps
    #[arg(long, value_name = "N", default_value_t = bandeig::solver::DEFAULT_MAX_ITER)]
    max_iter: usize,
    /// Shift used by each QR sweep
    #[arg(long, value_enum, default_value_t = ShiftStrategy::Wilkinson)]
    shift: ShiftStrategy,
    /// Do not normalise the matrix before reduction (thresholds become absolute)
    #[arg(long)]
    no_scale: bool,
}

impl SolverArgs {
    fn config(&self) -> SolverConfig {
        SolverConfig::new(self.eps, self.max_iter)
            .with_shift(self.shift)
            .with_scaling(!self.no_scale)
    }
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Path to the matrix CSV file (one row per line)
    #[arg(short, long, value_name = "CSV")]
    input: PathBuf,
    /// Number of sub-diagonals; detected from the matrix when omitted
    #[arg(short = 'k', long, value_name = "K")]
    bandwidth: Option<usize>,
    /// Write the eigenvalues to this CSV file
    #[arg(short, long, value_name = "CSV")]
    output: Option<PathBuf>,
    /// Compare against a dense reference solver
    #[arg(long)]
    check: bool,
    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Args, Debug)]
struct RandomArgs {
    /// Matrix order
    #[arg(short = 'n', long, value_name = "N")]
    size: usize,
    /// Number of sub-diagonals
    #[arg(short = 'k', long, value_name = "K")]
    bandwidth: usize,
    /// Seed for the generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Also write the generated matrix to this CSV file
    #[arg(long, value_name = "CSV")]
    save_matrix: Option<PathBuf>,
    #[command(flatten)]
    solver: SolverArgs,
}

const DEMO_ROWS: [[f64; 5]; 5] = [
    [4.0, 1.0, 2.0, 0.0, 0.0],
    [1.0, 3.0, 1.0, 2.0, 0.0],
    [2.0, 1.0, 4.0, 1.0, 0.0],
    [0.0, 2.0, 1.0, 5.0, 1.0],
    [0.0, 0.0, 0.0, 1.0, 3.0],
];

fn init_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))
}

/// Solves `a`, optionally checks the result, prints it and returns the eigenvalues.
fn solve_and_report(
    mut a: BandMatrix,
    config: &SolverConfig,
    check: bool,
    color: ColorChoice,
) -> Result<EigenResults> {
    let reference = check.then(|| reference_eigenvalues(&a));
    log::info!(
        "Solving order {} matrix with bandwidth {} (eps {:e}, max {} sweeps, {:?} shift)",
        a.order(),
        a.bandwidth(),
        config.eps,
        config.max_iter,
        config.shift
    );

    let results = qr_eigs_band_with(&mut a, config)?;
    log::info!(
        "Converged in {} sweeps ({} rotations in reduction, {} deflations, {} splits)",
        results.stats.iterations,
        results.reduction.applied,
        results.stats.deflations,
        results.stats.splits
    );

    eigen_print::print_eigenvalues(&results.eigenvalues, color)?;

    if let Some(reference) = reference {
        let deviation = results
            .eigenvalues
            .iter()
            .zip(&reference)
            .map(|(got, want)| (got - want).abs())
            .fold(0.0_f64, f64::max);
        log::info!("Max deviation from dense reference: {:e}", deviation);
    }
    Ok(results)
}

fn run(cli: Cli) -> Result<()> {
    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Command::Solve(args) => {
            let SolveArgs {
                input,
                bandwidth,
                output,
                check,
                solver,
            } = args;
            let rows = matrix_io::load_matrix_csv(&input)
                .with_context(|| format!("Failed to read matrix from {:?}", input))?;
            let a = match bandwidth {
                Some(k) => BandMatrix::from_rows(&rows, k)?,
                None => BandMatrix::from_rows_detect(&rows)?,
            };
            let results = solve_and_report(a, &solver.config(), check, color)?;
            if let Some(output) = output {
                matrix_io::save_eigenvalues_csv(&results.eigenvalues, &output)
                    .with_context(|| format!("Failed to write eigenvalues to {:?}", output))?;
                log::info!("Eigenvalues written to {:?}", output);
            }
        }
        Command::Demo(args) => {
            let rows: Vec<Vec<f64>> = DEMO_ROWS.iter().map(|row| row.to_vec()).collect();
            let a = BandMatrix::from_rows(&rows, 2)?;

            let mut scratch = a.clone();
            let form = tridiagonalize_band(&mut scratch);
            eigen_print::print_tridiagonal(&form, color)?;
            log::info!(
                "Trace before reduction {:.12}, after {:.12}",
                a.trace(),
                form.trace()
            );

            solve_and_report(a, &args.solver.config(), true, color)?;
        }
        Command::Random(args) => {
            let RandomArgs {
                size,
                bandwidth,
                seed,
                save_matrix,
                solver,
            } = args;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = BandMatrix::random(size, bandwidth, &mut rng)?;
            if let Some(path) = save_matrix {
                let rows: Vec<Vec<f64>> = (0..a.order()).map(|i| a.row(i).to_vec()).collect();
                matrix_io::save_matrix_csv(&rows, &path)
                    .with_context(|| format!("Failed to write matrix to {:?}", path))?;
            }
            solve_and_report(a, &solver.config(), true, color)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logger(cli.verbose) {
        eprintln!("[bandeig error] {:#}", err);
    }

    let code = match run(cli) {
        Ok(()) => error::STATUS_OK,
        Err(err) => {
            log::error!("{:#}", err);
            err.downcast_ref::<EigenError>()
                .map(EigenError::status_code)
                .unwrap_or(error::STATUS_INVALID_INPUT)
        }
    };
    std::process::exit(code);
}
