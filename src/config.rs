/*
 *  config.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::BoardOptions;
use crate::constants::{MAX_DAY_CARDS, MAX_FRAME_DELAY_MS, MIN_FRAME_DELAY_MS};
use crate::weather::TempUnit;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every key is optional; accessors supply defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub api_key: Option<String>,
    /// Place name, zip or address; empty means "where am I"
    pub location: Option<String>,
    pub units: Option<String>,         // "us" | "si"
    pub output: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub frame_delay_ms: Option<u16>,
    pub repeat: Option<u16>,           // 0 loops forever
    pub days: Option<usize>,
    pub classic: Option<bool>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "retrocast", about = "RetroCast weather board", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub api_key: Option<String>,
    /// Location to forecast (omit for IP geolocation)
    #[arg(short, long)]
    pub location: Option<String>,
    #[arg(long)]
    pub units: Option<String>,
    /// Where to write the GIF
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// Asset directory (background.png and icon folders)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub assets: Option<PathBuf>,
    #[arg(long)]
    pub frame_delay_ms: Option<u16>,
    #[arg(long)]
    pub repeat: Option<u16>,
    #[arg(long)]
    pub days: Option<usize>,
    /// Minimal board: full address, no humidity
    #[arg(long, action = ArgAction::Set)]
    pub classic: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn units(&self) -> TempUnit {
        self.units
            .as_deref()
            .and_then(TempUnit::from_units_code)
            .unwrap_or(TempUnit::F)
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("weather.gif"))
    }

    pub fn assets(&self) -> PathBuf {
        self.assets.clone().unwrap_or_else(|| PathBuf::from("./res"))
    }
}

impl From<&Config> for BoardOptions {
    fn from(cfg: &Config) -> Self {
        let defaults = BoardOptions::default();
        BoardOptions {
            days: cfg.days.unwrap_or(defaults.days),
            frame_delay_ms: cfg.frame_delay_ms.unwrap_or(defaults.frame_delay_ms),
            repeat: cfg.repeat.unwrap_or(defaults.repeat),
            classic: cfg.classic.unwrap_or(defaults.classic),
        }
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer an already-parsed command line over defaults and the YAML file.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/retrocast/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/retrocast/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/retrocast.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["retrocast.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.api_key.is_some()        { dst.api_key = src.api_key; }
    if src.location.is_some()       { dst.location = src.location; }
    if src.units.is_some()          { dst.units = src.units; }
    if src.output.is_some()         { dst.output = src.output; }
    if src.assets.is_some()         { dst.assets = src.assets; }
    if src.frame_delay_ms.is_some() { dst.frame_delay_ms = src.frame_delay_ms; }
    if src.repeat.is_some()         { dst.repeat = src.repeat; }
    if src.days.is_some()           { dst.days = src.days; }
    if src.classic.is_some()        { dst.classic = src.classic; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()      { cfg.log_level = cli.log_level.clone(); }
    if cli.api_key.is_some()        { cfg.api_key = cli.api_key.clone(); }
    if cli.location.is_some()       { cfg.location = cli.location.clone(); }
    if cli.units.is_some()          { cfg.units = cli.units.clone(); }
    if cli.output.is_some()         { cfg.output = cli.output.clone(); }
    if cli.assets.is_some()         { cfg.assets = cli.assets.clone(); }
    if cli.frame_delay_ms.is_some() { cfg.frame_delay_ms = cli.frame_delay_ms; }
    if cli.repeat.is_some()         { cfg.repeat = cli.repeat; }
    if cli.days.is_some()           { cfg.days = cli.days; }
    if cli.classic.is_some()        { cfg.classic = cli.classic; }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(delay) = cfg.frame_delay_ms {
        if !(MIN_FRAME_DELAY_MS..=MAX_FRAME_DELAY_MS).contains(&delay) {
            return Err(ConfigError::Validation(format!(
                "frame_delay_ms must be {MIN_FRAME_DELAY_MS}..={MAX_FRAME_DELAY_MS}"
            )));
        }
    }
    if let Some(days) = cfg.days {
        if !(1..=MAX_DAY_CARDS).contains(&days) {
            return Err(ConfigError::Validation(format!("days must be 1..={MAX_DAY_CARDS}")));
        }
    }
    if let Some(units) = cfg.units.as_deref() {
        match units {
            "us" | "si" => {}
            _ => return Err(ConfigError::Validation("units must be us|si".into())),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_FRAME_DELAY_MS;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("retrocast-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let dir = scratch("precedence");
        let path = dir.join("retrocast.yaml");
        fs::write(&path, "api_key: abc\nlocation: \"07849\"\ndays: 3\nunits: si\n").unwrap();

        let cli = Cli { config: Some(path), days: Some(2), classic: Some(true), ..Cli::default() };
        let cfg = load_from(&cli).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.location(), "07849");
        assert_eq!(cfg.days, Some(2));
        assert_eq!(cfg.units(), TempUnit::C);

        let opts = BoardOptions::from(&cfg);
        assert_eq!(opts.days, 2);
        assert!(opts.classic);
        assert_eq!(opts.frame_delay_ms, DEFAULT_FRAME_DELAY_MS);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_explicit_file() {
        let cli = Cli { config: Some(PathBuf::from("/definitely/not/here.yaml")), ..Cli::default() };
        assert!(matches!(load_from(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_yaml() {
        let dir = scratch("bad-yaml");
        let path = dir.join("config.yaml");
        fs::write(&path, "days: [not, a, number]\n").unwrap();
        let cli = Cli { config: Some(path), ..Cli::default() };
        assert!(matches!(load_from(&cli), Err(ConfigError::Yaml(_))));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_validation_ranges() {
        let bad = [
            Config { days: Some(0), ..Config::default() },
            Config { days: Some(5), ..Config::default() },
            Config { frame_delay_ms: Some(5), ..Config::default() },
            Config { frame_delay_ms: Some(5000), ..Config::default() },
            Config { units: Some("kelvin".into()), ..Config::default() },
        ];
        for cfg in bad {
            assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))), "{cfg:?}");
        }
        assert!(validate(&Config { days: Some(4), frame_delay_ms: Some(150), ..Config::default() }).is_ok());
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.location(), "");
        assert_eq!(cfg.units(), TempUnit::F);
        assert_eq!(cfg.output(), PathBuf::from("weather.gif"));
        assert_eq!(cfg.assets(), PathBuf::from("./res"));
        assert_eq!(BoardOptions::from(&cfg), BoardOptions::default());
    }
}
