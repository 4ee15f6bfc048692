//! Content loading and seed handling for hoops_core callers.

use anyhow::{Context, Result};
use hoops_core::{validate_content, Constants, EngineContent, ProbabilityTables, WeightTables};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize)]
struct ProbabilitiesFile {
    content_version: String,
    probabilities: ProbabilityTables,
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let text =
        std::fs::read_to_string(dir.join(file)).with_context(|| format!("reading {file}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {file}"))
}

/// Load and validate the tuning files under `content_dir`.
pub fn load_content(content_dir: &str) -> Result<EngineContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = read_json(dir, "constants.json")?;
    let weights: WeightTables = read_json(dir, "weights.json")?;
    let probabilities_file: ProbabilitiesFile = read_json(dir, "probabilities.json")?;
    let content = EngineContent {
        content_version: probabilities_file.content_version,
        constants,
        weights,
        probabilities: probabilities_file.probabilities,
    };
    validate_content(&content).with_context(|| format!("validating content in {content_dir}"))?;
    info!(
        content_version = %content.content_version,
        dir = content_dir,
        "content loaded"
    );
    Ok(content)
}

/// The caller's seed, or a fresh one from OS entropy.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let drawn = rand::random();
        debug!(seed = drawn, "no seed given, drew one");
        drawn
    })
}

pub fn game_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
