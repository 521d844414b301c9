mod network;
mod services;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SEED: u64 = 1;
const DEFAULT_OUT_DIR: &str = "./data";
const INFRASTRUCTURE_FILE: &str = "i1.json";
const TIMETABLE_FILE: &str = "tt1.json";

/// Output directory and RNG seed for one generator run
#[derive(Debug, Clone, PartialEq)]
struct GeneratorConfig {
    seed: u64,
    out_dir: PathBuf,
}

impl GeneratorConfig {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let seed = match var("SEED") {
            Some(value) => value.parse().map_err(|_| format!("Invalid SEED: {value}"))?,
            None => DEFAULT_SEED,
        };
        Ok(Self {
            seed,
            out_dir: var("OUT_DIR").map_or_else(|| PathBuf::from(DEFAULT_OUT_DIR), PathBuf::from),
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn run(config: &GeneratorConfig) -> Result<(), String> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let network = network::generate_network(&mut rng)?;
    let timetable = services::generate_timetable(&network, &mut rng)?;

    fs::create_dir_all(&config.out_dir)
        .map_err(|e| format!("Failed to create {}: {e}", config.out_dir.display()))?;
    write_json(&config.out_dir.join(INFRASTRUCTURE_FILE), &network.infrastructure)?;
    write_json(&config.out_dir.join(TIMETABLE_FILE), &timetable)?;

    log::info!("Wrote {} with seed {}", config.out_dir.display(), config.seed);
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let result =
        GeneratorConfig::from_vars(|key| env::var(key).ok()).and_then(|config| run(&config));
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
