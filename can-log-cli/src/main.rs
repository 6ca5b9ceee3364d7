//! CAN Log CLI Application
//!
//! This is the command-line interface for the CAN log statistics library.
//! It wraps can-log-stats with file handling, configuration and logging:
//! - DBC generation with one signal per payload byte
//! - Per-ID message count and rate summary
//! - Frame listing for a single ID
//! - candump `-ta` to `-l` conversion

use anyhow::{bail, Context, Result};
use can_log_stats::formats::convert_ascii_log;
use can_log_stats::{dbc, CandumpParser, DbcWriter, FrameRecord, StatsTable};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;
mod report;

/// CAN Log CLI - Profile candump logs and generate DBC files
#[derive(Parser, Debug)]
#[command(name = "can-log-cli")]
#[command(about = "Profile candump logs and generate DBC schemas", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a DBC file with one signal for every byte of every CAN ID in a log
    Dbc(DbcArgs),

    /// List every CAN ID with its message count and average frequency
    Ids {
        /// Path to candump log
        log: PathBuf,

        /// Print the full statistics table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every frame of one CAN ID
    Messages {
        /// Path to candump log
        log: PathBuf,

        /// CAN ID exactly as written in the log
        id: String,

        /// Show timestamps as RFC 3339 dates
        #[arg(long)]
        absolute: bool,
    },

    /// Convert a `candump -ta` capture into replayable `candump -l` format
    Convert {
        /// Path to candump -ta output
        log: PathBuf,

        /// New file to write to (default: <LOG>.converted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct DbcArgs {
    /// Path to candump log
    log: PathBuf,

    /// Path of DBC file to generate (default: <LOG> with .dbc extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Use the minimum number of bytes observed for each ID
    #[arg(long, alias = "use_min_bytes")]
    use_min_bytes: bool,

    /// Ignore bytes that are constant across the entire log
    #[arg(long, alias = "ignore_constant")]
    ignore_constant: bool,

    /// Minimum average frequency (Hz), below which an ID is ignored
    #[arg(long, alias = "min_frequency", value_name = "HZ")]
    min_frequency: Option<f64>,

    /// Maximum average frequency (Hz), above which an ID is ignored
    #[arg(long, alias = "max_frequency", value_name = "HZ")]
    max_frequency: Option<f64>,

    /// Path to configuration file (TOML); flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// VERSION string written to the DBC file
    #[arg(long, value_name = "STRING")]
    dbc_version: Option<String>,

    /// Node name used as transmitter and receiver
    #[arg(long, value_name = "NAME")]
    node: Option<String>,

    /// Worker threads used to build statistics
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using statistics library v{}", can_log_stats::VERSION);

    match args.command {
        Command::Dbc(dbc_args) => dbc_mode(dbc_args),
        Command::Ids { log, json } => ids_mode(&log, json),
        Command::Messages { log, id, absolute } => messages_mode(&log, &id, absolute),
        Command::Convert { log, output } => convert_mode(&log, output),
    }
}

/// Build statistics and write a DBC file
fn dbc_mode(args: DbcArgs) -> Result<()> {
    let log_path = input_path(&args.log)?;

    let app_config = match &args.config {
        Some(path) => config::load_config(&expand_home(path))?,
        None => config::AppConfig::default(),
    }
    .apply(config::Overrides {
        use_min_bytes: args.use_min_bytes,
        ignore_constant: args.ignore_constant,
        min_frequency: args.min_frequency,
        max_frequency: args.max_frequency,
        version: args.dbc_version,
        node: args.node,
    });
    log::debug!("Synthesis options: {:?}", app_config.synthesis);

    let output = match args.output {
        Some(path) => expand_home(&path),
        None => log_path.with_extension("dbc"),
    };

    let table = if args.jobs > 1 {
        let records: Vec<FrameRecord> = CandumpParser::parse(&log_path)?
            .collect::<can_log_stats::Result<_>>()
            .with_context(|| format!("Failed to parse CAN log {:?}", log_path))?;
        StatsTable::build_sharded(&records, args.jobs)?
    } else {
        StatsTable::build(CandumpParser::parse(&log_path)?)
            .with_context(|| format!("Failed to parse CAN log {:?}", log_path))?
    };

    if table.is_empty() {
        bail!("No CAN data found in log!");
    }

    let mut writer = DbcWriter::new();
    if let Some(version) = app_config.output.version {
        writer = writer.with_version(version);
    }
    if let Some(node) = app_config.output.node {
        writer = writer.with_node(node);
    }

    let text = dbc::generate_dbc(&table, &app_config.synthesis, &writer)?;
    fs::write(&output, text).with_context(|| format!("Failed to write DBC file {:?}", output))?;

    log::info!("Wrote {:?}", output);
    println!("Done!");
    Ok(())
}

/// Print the per-ID summary
fn ids_mode(log: &Path, json: bool) -> Result<()> {
    let log_path = input_path(log)?;
    let table = StatsTable::build(CandumpParser::parse(&log_path)?)
        .with_context(|| format!("Failed to parse CAN log {:?}", log_path))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        report::write_id_json(&mut out, &table)
    } else {
        report::write_id_table(&mut out, &table)
    }
}

/// Print every frame of one ID
fn messages_mode(log: &Path, id: &str, absolute: bool) -> Result<()> {
    let log_path = input_path(log)?;
    let frames = CandumpParser::parse(&log_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let count = report::write_messages(&mut out, frames, id, absolute)
        .with_context(|| format!("Failed to read CAN log {:?}", log_path))?;

    if count == 0 {
        log::warn!("No frames with ID {} in {:?}", id, log_path);
    }
    Ok(())
}

/// Convert candump -ta output into candump -l format
fn convert_mode(log: &Path, output: Option<PathBuf>) -> Result<()> {
    let log_path = input_path(log)?;
    let output = match output {
        Some(path) => expand_home(&path),
        None => {
            let mut name = log_path.clone().into_os_string();
            name.push(".converted");
            PathBuf::from(name)
        }
    };

    let reader = BufReader::new(File::open(&log_path)?);
    let mut writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {:?}", output))?,
    );

    let lines = convert_ascii_log(reader, &mut writer)
        .with_context(|| format!("Failed to convert {:?}", log_path))?;
    writer.flush()?;

    log::info!("Converted {} lines into {:?}", lines, output);
    Ok(())
}

/// Expand `~/` and make sure the input log exists
fn input_path(path: &Path) -> Result<PathBuf> {
    let path = expand_home(path);
    if !path.is_file() {
        bail!("CAN log '{}' does not exist", path.display());
    }
    Ok(path)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
