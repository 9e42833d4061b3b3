use std::{fs, path::Path};

use anyhow::{Context, Result};
use spooknloot_world::WorldConfig;

/// Loads the session configuration, applying a seed override when given.
pub(crate) fn load(path: Option<&Path>, seed: Option<u64>) -> Result<WorldConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration at {}", path.display()))?;
            parse(&contents)?
        }
        None => WorldConfig::default(),
    };

    if seed.is_some() {
        config.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<WorldConfig> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}
