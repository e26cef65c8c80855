//! Server configuration from the environment

use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use measure_units::{builtin_catalogue, load_catalogue_file, merge_catalogues, CategoryRegistry, ConversionError};

pub const CATALOGUE_PATH_VAR: &str = "MEASURE_CATALOGUE_PATH";
pub const BUILTIN_CATALOGUE_VAR: &str = "MEASURE_BUILTIN_CATALOGUE";
pub const PRECISION_VAR: &str = "MEASURE_PRECISION";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON catalogue merged over (or replacing) the built-in one
    pub catalogue_path: Option<PathBuf>,
    pub builtin_catalogue: bool,
    /// Default decimals for tool results; `None` keeps full precision
    pub precision: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config { catalogue_path: None, builtin_catalogue: true, precision: None }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let catalogue_path = lookup(CATALOGUE_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let builtin_catalogue = match lookup(BUILTIN_CATALOGUE_VAR) {
            None => true,
            Some(v) => parse_flag(&v).ok_or_else(|| format!("{} must be true or false, got '{}'", BUILTIN_CATALOGUE_VAR, v))?,
        };

        let precision = match lookup(PRECISION_VAR) {
            None => None,
            Some(v) => Some(v.trim().parse::<u32>()
                .map_err(|_| format!("{} must be a non-negative integer, got '{}'", PRECISION_VAR, v))?),
        };

        Ok(Config { catalogue_path, builtin_catalogue, precision })
    }

    /// Build and validate the category registry this configuration describes
    pub fn build_registry(&self) -> Result<CategoryRegistry, ConversionError> {
        let base = if self.builtin_catalogue { builtin_catalogue() } else { Vec::new() };

        let specs = match &self.catalogue_path {
            Some(path) => {
                let overlay = load_catalogue_file(path)?;
                info!(path = %path.display(), categories = overlay.len(), "catalogue file loaded");
                merge_catalogues(base, overlay)
            }
            None => base,
        };

        let registry = CategoryRegistry::from_catalogue(specs)?;
        if registry.is_empty() {
            warn!("no categories registered; set {} or enable {}", CATALOGUE_PATH_VAR, BUILTIN_CATALOGUE_VAR);
        }
        Ok(registry)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
