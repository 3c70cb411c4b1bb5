use std::path::Path;

use config::{Config, File as ConfigFile, FileFormat};
use serde::Deserialize;

use crate::error::Error;

/// A single cleanup rule from the YAML rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub name: String,
    pub paths: Vec<String>,
    pub older_than: Option<String>,
    pub larger_than: Option<String>,
    pub smaller_than: Option<String>,
    pub patterns: Vec<String>,
    pub extensions: Vec<String>,
    pub skip_hidden: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub rules: Vec<RuleConfig>,
}

/// Load cleanup rules from a YAML file. A file without a `rules` key yields
/// an empty config; a missing or malformed file is a configuration error.
pub fn load_rules(path: &Path) -> Result<CleanConfig, Error> {
    let settings = Config::builder()
        .add_source(ConfigFile::from(path.to_path_buf()).format(FileFormat::Yaml))
        .build()?;
    Ok(settings.try_deserialize()?)
}

/// Remove directories that are subdirectories of other directories in the
/// list, so overlapping rule paths are not scanned twice.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(&dir);
        let mut should_add = true;
        let result_clone = result.clone();

        for res_dir in &result_clone {
            let res_dir_path = Path::new(res_dir);

            if dir_path.starts_with(res_dir_path) {
                should_add = false;
                break;
            }

            if res_dir_path.starts_with(dir_path) {
                result.retain(|x| x != res_dir);
                break;
            }
        }

        if should_add {
            result.push(dir);
        }
    }

    result
}
