use std::error::Error;

use clap::Args;
use lsym_state::Tier;
use serde::Serialize;

use crate::config::emit;

#[derive(Args, Debug)]
pub struct TiersArgs {
    /// Emit only JSON without the human readable line.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct TierReport {
    available: Vec<Tier>,
    detected: Tier,
}

pub fn run(args: &TiersArgs) -> Result<(), Box<dyn Error>> {
    let report = TierReport {
        available: Tier::available(),
        detected: Tier::detect(),
    };
    if !args.quiet {
        println!("lsym kernels run on the {} tier", report.detected);
    }
    emit(&report, None)
}
