//! Application configuration.
//!
//! Stored as pretty-printed JSON (`config.json`) in the data directory next
//! to the database. A missing file means defaults, so the application runs
//! without any setup.
//!
//! ```rust,no_run
//! use babylog::libs::config::Config;
//!
//! let mut config = Config::read()?;
//! config.chart_width = 60;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::range::RangeView;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

/// Configuration file name in the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

const MIN_CHART_WIDTH: usize = 10;
const MAX_CHART_WIDTH: usize = 200;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Range used by `records list` and `records chart` when none is given.
    pub default_view: RangeView,

    /// Width in characters of the longest bar in terminal charts.
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { default_view: RangeView::Past7Days, chart_width: 40 }
    }
}

impl Config {
    /// Reads the configuration from the data directory, or defaults if absent.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            serde_json::from_str(&config_str).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.normalized())
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path).with_context(|| format!("writing {}", path.display()))?;
        serde_json::to_writer_pretty(&config_file, &self.clone().normalized())?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether one existed.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Interactive setup, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let current = Config::read()?;
        let views = [RangeView::Today, RangeView::Past7Days];
        let labels: Vec<&str> = views.iter().map(|v| v.label()).collect();
        let default_index = views.iter().position(|v| *v == current.default_view).unwrap_or(1);

        let selected = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Default range view")
            .items(&labels)
            .default(default_index)
            .interact()?;

        let chart_width: usize = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Chart width (characters)")
            .default(current.chart_width)
            .validate_with(|input: &usize| -> std::result::Result<(), String> {
                if (MIN_CHART_WIDTH..=MAX_CHART_WIDTH).contains(input) {
                    Ok(())
                } else {
                    Err(format!("Width must be between {} and {}", MIN_CHART_WIDTH, MAX_CHART_WIDTH))
                }
            })
            .interact_text()?;

        Ok(Config { default_view: views[selected], chart_width })
    }

    fn normalized(mut self) -> Self {
        self.chart_width = self.chart_width.clamp(MIN_CHART_WIDTH, MAX_CHART_WIDTH);
        self
    }
}
