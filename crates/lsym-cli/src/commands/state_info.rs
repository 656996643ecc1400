use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsym_core::{Bits512, RngHandle};
use lsym_state::{kernels, BasisBody, Kernels, SpinBasis, Tier};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{emit, load_generators};

#[derive(Args, Debug)]
pub struct StateInfoArgs {
    /// YAML or JSON generator set, including the spin-inversion mode.
    #[arg(long)]
    pub config: PathBuf,
    /// Configurations to query: decimal, `0x` hexadecimal or `0b` binary.
    #[arg(long = "state", value_name = "BITS")]
    pub states: Vec<String>,
    /// Additionally draw this many random configurations.
    #[arg(long, default_value_t = 0)]
    pub random: usize,
    /// Seed for `--random`.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Force a capability tier (`sse2`, `avx` or `avx2`) instead of the detected one.
    #[arg(long)]
    pub tier: Option<String>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct StateRecord {
    state: String,
    representative: String,
    character: [f64; 2],
    norm: f64,
    is_representative: bool,
}

#[derive(Debug, Serialize)]
struct StateInfoReport {
    tier: Tier,
    number_of_sites: usize,
    spin_inversion: i32,
    states: Vec<StateRecord>,
}

fn select_kernels(name: Option<&str>) -> Result<&'static Kernels, Box<dyn Error>> {
    let tier = match name {
        None => Tier::detect(),
        Some(name) => Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("unknown tier '{name}'"))?,
    };
    kernels(tier).ok_or_else(|| format!("tier '{tier}' is not supported by this processor").into())
}

fn query(kernels: &Kernels, basis: &SpinBasis, bits: Bits512) -> Result<StateRecord, Box<dyn Error>> {
    basis.header.check_state_512(&bits)?;
    let record = match &basis.body {
        BasisBody::Small(body) => {
            let narrow = bits.words[0];
            let info = (kernels.state_info_64)(&basis.header, body, narrow);
            StateRecord {
                state: bits.to_string(),
                representative: Bits512::from_u64(info.representative).to_string(),
                character: [info.character.re, info.character.im],
                norm: info.norm,
                is_representative: (kernels.is_representative_64)(&basis.header, body, narrow),
            }
        }
        BasisBody::Big(body) => {
            let info = (kernels.state_info_512)(&basis.header, body, &bits);
            StateRecord {
                state: bits.to_string(),
                representative: info.representative.to_string(),
                character: [info.character.re, info.character.im],
                norm: info.norm,
                is_representative: (kernels.is_representative_512)(&basis.header, body, &bits),
            }
        }
    };
    debug!(state = %record.state, representative = %record.representative, norm = record.norm, "state info");
    Ok(record)
}

pub fn run(args: &StateInfoArgs) -> Result<(), Box<dyn Error>> {
    if args.states.is_empty() && args.random == 0 {
        return Err("pass at least one --state or a positive --random".into());
    }
    let set = load_generators(&args.config)?;
    let group = set.build_group()?;
    let basis = SpinBasis::new(&group, set.spin_inversion)?;
    let kernels = select_kernels(args.tier.as_deref())?;
    let number_of_sites = basis.header.number_of_sites;

    let mut configurations = args
        .states
        .iter()
        .map(|raw| raw.parse::<Bits512>())
        .collect::<Result<Vec<_>, _>>()?;
    let mut rng = RngHandle::from_seed(args.seed);
    configurations.extend((0..args.random).map(|_| rng.configuration_512(number_of_sites)));

    let states = configurations
        .into_iter()
        .map(|bits| query(kernels, &basis, bits))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        tier = kernels.tier.name(),
        group_size = group.len(),
        queried = states.len(),
        "computed state info"
    );
    emit(
        &StateInfoReport {
            tier: kernels.tier,
            number_of_sites,
            spin_inversion: basis.header.spin_inversion,
            states,
        },
        args.out.as_deref(),
    )
}
