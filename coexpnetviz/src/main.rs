use coexpnetviz::error::as_cenv_error;
use coexpnetviz::input::InvocationArgs;
use coexpnetviz::output::write_network_json;
use coexpnetviz::run::run_coexpnetviz;

use clap::Parser;
use log::{error, info, LevelFilter};
use matrix_util::common_io::{is_broken_pipe, open_buf_reader};
use std::io::Write;
use std::path::Path;

const LOG_FILE: &str = "coexpnetviz.log";
const EXIT_BROKEN_PIPE: i32 = 120;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
///
/// Build a comparative co-expression network around bait genes.
///
/// The run is described by a JSON document (output directory, baits,
/// expression matrices, optional gene families and percentile ranks).
/// The network is printed as JSON on stdout; tables, plots and
/// Cytoscape files are written to the output directory.
///
struct Cli {
    /// JSON invocation file (default: read stdin)
    #[arg(short, long)]
    input: Option<Box<str>>,

    /// Base name of the Cytoscape files
    #[arg(short, long, default_value = "network")]
    network_name: Box<str>,

    /// Log progress, not only warnings
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => report(&cli, &err),
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let args = match &cli.input {
        Some(file) => InvocationArgs::from_json_reader(open_buf_reader(file)?)?,
        None => InvocationArgs::from_json_reader(std::io::stdin().lock())?,
    };

    let output_dir = args.output_dir()?;
    init_file_logger(cli.log_level(), &output_dir)?;
    info!("Invocation: {:?}", args);

    let network = run_coexpnetviz(&args, &cli.network_name)?;

    let stdout = std::io::stdout();
    write_network_json(&mut stdout.lock(), &network)?;
    Ok(())
}

fn init_file_logger(level: LevelFilter, output_dir: &Path) -> anyhow::Result<()> {
    let log_file = std::fs::File::create(output_dir.join(LOG_FILE))?;
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .try_init()?;
    Ok(())
}

/// Log the failure and pick the exit code
fn report(cli: &Cli, err: &anyhow::Error) -> i32 {
    if is_broken_pipe(err) {
        return EXIT_BROKEN_PIPE;
    }

    // fails when the file logger is already installed
    let logging_to_stderr = env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .try_init()
        .is_ok();

    match as_cenv_error(err) {
        Some(cenv) => {
            error!("{}", cenv);
            if !logging_to_stderr {
                let _ = writeln!(std::io::stderr(), "{}", cenv);
            }
        }
        None => error!("Uncaught exception: {:?}", err),
    }
    1
}
