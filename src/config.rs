use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;

use crate::usecase::services::import_service::IngestLimits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite(PathBuf),
    /// Nothing survives a restart.
    Memory,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub store: StoreKind,
    pub limits: IngestLimits,
    pub max_body_bytes: usize,
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "metlab", "meter-consolidator")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("consolidated.sqlite"))
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("invalid {name}={raw:?}: {err}")),
        None => Ok(default),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> Result<bool> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("invalid {name}={raw:?}: expected true or false"),
    }
}

impl AppConfig {
    /// Load configuration from `METER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = IngestLimits::default();

        let bind = parse_var(&lookup, "METER_BIND", SocketAddr::from(([127, 0, 0, 1], 5000)))?;

        let store = match lookup("METER_STORE")
            .unwrap_or_else(|| "sqlite".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "sqlite" => {
                let db_path = match lookup("METER_DB_PATH") {
                    Some(path) => PathBuf::from(path),
                    None => default_db_path().context("set METER_DB_PATH explicitly")?,
                };
                StoreKind::Sqlite(db_path)
            }
            "memory" => StoreKind::Memory,
            other => bail!("invalid METER_STORE={other:?}: expected sqlite or memory"),
        };

        let limits = IngestLimits {
            max_files: parse_var(&lookup, "METER_MAX_FILES", defaults.max_files)?,
            max_file_bytes: parse_var(&lookup, "METER_MAX_FILE_BYTES", defaults.max_file_bytes)?,
            skip_blank_rows: parse_flag(
                &lookup,
                "METER_SKIP_BLANK_ROWS",
                defaults.skip_blank_rows,
            )?,
        };
        let max_body_bytes = parse_var(&lookup, "METER_MAX_BODY_BYTES", 256 * 1024 * 1024)?;

        if limits.max_files == 0 {
            bail!("METER_MAX_FILES must be greater than zero");
        }
        if limits.max_file_bytes == 0 || max_body_bytes == 0 {
            bail!("byte limits must be greater than zero");
        }

        Ok(Self {
            bind,
            store,
            limits,
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn memory_store_with_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("METER_STORE", "memory")]))
            .expect("config should load");

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.bind.port(), 5000);
        assert_eq!(config.limits, IngestLimits::default());
    }

    #[test]
    fn explicit_sqlite_path_and_limits() {
        let config = AppConfig::from_lookup(lookup(&[
            ("METER_DB_PATH", "/tmp/meters.sqlite"),
            ("METER_BIND", "0.0.0.0:8080"),
            ("METER_MAX_FILES", "3"),
            ("METER_SKIP_BLANK_ROWS", "no"),
        ]))
        .expect("config should load");

        assert_eq!(
            config.store,
            StoreKind::Sqlite(PathBuf::from("/tmp/meters.sqlite"))
        );
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.limits.max_files, 3);
        assert!(!config.limits.skip_blank_rows);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("METER_STORE", "redis")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[
            ("METER_STORE", "memory"),
            ("METER_MAX_FILES", "lots"),
        ]))
        .is_err());
        assert!(AppConfig::from_lookup(lookup(&[
            ("METER_STORE", "memory"),
            ("METER_MAX_FILES", "0"),
        ]))
        .is_err());
    }
}
