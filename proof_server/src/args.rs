//! Parses command-line arguments for the proof server.

use std::path::PathBuf;

use clap::{crate_version, Parser};

#[derive(Debug, Parser)]
#[clap(
    name = "proof-server",
    about = "Serves inclusion proofs for the outgoing message accumulator",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[clap(
        long,
        short = 'c',
        env = "PROOF_SERVER_CONFIG",
        help = "The file containing the configuration for the proof server",
        default_value = "config.toml"
    )]
    pub config: PathBuf,
}
