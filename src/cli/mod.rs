use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use spectrum_io::search_result::SearchEngineKind;

mod config;
mod convert;
mod profile;

pub use profile::Profile;

/// spectrum-io - Search engine result converter
#[derive(Parser)]
#[command(name = "spectrum-io")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Search engine whose output is converted.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EngineArg {
    /// MaxQuant msms.txt
    Maxquant,
    /// MSFragger pepXML
    Msfragger,
    /// Sage results.sage.tsv
    Sage,
    /// MSAmanda output.csv
    Msamanda,
    /// XlinkX crosslink table
    Xlinkx,
}

impl From<EngineArg> for SearchEngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Maxquant => SearchEngineKind::MaxQuant,
            EngineArg::Msfragger => SearchEngineKind::MsFragger,
            EngineArg::Sage => SearchEngineKind::Sage,
            EngineArg::Msamanda => SearchEngineKind::MsAmanda,
            EngineArg::Xlinkx => SearchEngineKind::XlinkX,
        }
    }
}

/// Writer profile trading file size against speed.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProfileArg {
    /// Prioritize speed over compression
    Fast,
    /// Balance between speed and compression
    Balanced,
    /// Maximum compression, slower conversion
    MaxCompression,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Profile::Fast,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::MaxCompression => Profile::MaxCompression,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert search engine results to the internal format
    Convert {
        /// Search engine that produced the input
        #[arg(value_name = "ENGINE", value_enum)]
        engine: EngineArg,

        /// Result file, or a directory of result files
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Internal table to write (.parquet or .csv)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Label chemistry (tmt, tmtpro, itraq4, itraq8, silac)
        #[arg(short, long)]
        label: Option<String>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Result file suffix used for directory inputs
        #[arg(short, long)]
        suffix: Option<String>,

        /// Extra modification pattern, e.g. --mod 'M[147]=35' (repeatable)
        #[arg(short = 'm', long = "mod", value_name = "KEY=ID")]
        mods: Vec<String>,

        /// Writer profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, value_enum)]
        profile: Option<ProfileArg>,

        // === Advanced tuning flags (hidden from --help) ===
        /// Compression level for ZSTD (1-22, default: profile-dependent)
        #[arg(short = 'c', long, hide = true)]
        compression_level: Option<i32>,

        /// Row group size (number of rows per row group)
        #[arg(short = 'r', long, hide = true)]
        row_group_size: Option<usize>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            engine,
            input,
            output,
            label,
            config,
            suffix,
            mods,
            profile,
            compression_level,
            row_group_size,
        } => convert::run(convert::ConvertArgs {
            engine: engine.into(),
            input,
            output,
            label,
            config,
            suffix,
            mods,
            profile: profile.map(Profile::from),
            compression_level,
            row_group_size,
        }),
    }
}
