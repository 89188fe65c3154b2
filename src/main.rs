//! # spectrum-io
//!
//! Command-line converter from search engine results to the internal PSM
//! table.
//!
//! ## Usage
//!
//! ```bash
//! # MaxQuant msms.txt to parquet
//! spectrum-io convert maxquant txt/msms.txt msms.parquet
//!
//! # Every Sage result in a directory, TMT labelled, with an extra modification
//! spectrum-io -v convert sage results/ sage.parquet --label tmt --mod 'M[+15.9949]=35'
//!
//! # Settings from a TOML file
//! spectrum-io convert msfragger fragger/ fragger.csv --config spectrum-io.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
