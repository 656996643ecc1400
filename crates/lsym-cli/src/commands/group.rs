use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::{emit, load_generators};

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// YAML or JSON generator set.
    #[arg(long)]
    pub config: PathBuf,
    /// Write the summary here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &GroupArgs) -> Result<(), Box<dyn Error>> {
    let set = load_generators(&args.config)?;
    let group = set.build_group()?;
    info!(
        size = group.len(),
        network_depth = group.network_depth().unwrap_or(0),
        "closed group"
    );
    emit(&group.summary(), args.out.as_deref())
}
