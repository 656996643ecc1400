use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;

use lsym_group::{from_json_slice, to_canonical_json_bytes, GeneratorSet};
use serde::Serialize;
use tracing::info;

/// Reads a generator set. `.json` files are parsed as JSON, anything else as YAML.
pub fn load_generators(path: &Path) -> Result<GeneratorSet, Box<dyn Error>> {
    let contents = fs::read(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let set: GeneratorSet = if is_json {
        from_json_slice(&contents)?
    } else {
        serde_yaml::from_slice(&contents)?
    };
    info!(
        path = %path.display(),
        number_of_sites = set.number_of_sites,
        generators = set.generators.len(),
        "loaded generator set"
    );
    Ok(set)
}

/// Writes `value` as canonical JSON to `out`, or to stdout when `out` is `None`.
pub fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let json = to_canonical_json_bytes(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &json)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
