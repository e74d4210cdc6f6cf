//! Run configuration
//!
//! Settings come from a TOML file (explicit `--config`, or `config.toml` in
//! the platform config directory) and fall back to built-in defaults. CLI
//! flags override whatever the file says.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::mapper::MIGRATION_REGISTRANT;

/// Aliases SQLite already uses for its own databases
const RESERVED_SCHEMAS: &[&str] = &["main", "temp"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Schema alias the tables live under
    #[serde(default = "default_schema")]
    pub schema: String,
    /// `{"Empresa": [...]}` export
    #[serde(default = "default_companies_file")]
    pub companies_file: PathBuf,
    /// `{"Socio": [...]}` export
    #[serde(default = "default_members_file")]
    pub members_file: PathBuf,
    /// Label written to `Cadastrante` on migrated rows
    #[serde(default = "default_registrant")]
    pub registrant: String,
}

fn default_database() -> PathBuf {
    PathBuf::from("sindplast.db")
}

fn default_schema() -> String {
    "Sindplast".to_string()
}

fn default_companies_file() -> PathBuf {
    PathBuf::from("Data").join("Empresas.json")
}

fn default_members_file() -> PathBuf {
    PathBuf::from("Data").join("Socios.json")
}

fn default_registrant() -> String {
    MIGRATION_REGISTRANT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            schema: default_schema(),
            companies_file: default_companies_file(),
            members_file: default_members_file(),
            registrant: default_registrant(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// `config.toml` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("br", "sindplast", "sindplast-registry")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, database: Option<PathBuf>, schema: Option<String>) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(schema) = schema {
            self.schema = schema;
        }
        self
    }

    /// The schema name ends up in SQL text, so it must be a plain identifier
    pub fn validate(&self) -> Result<()> {
        let valid = !self.schema.is_empty()
            && !self.schema.starts_with(|c: char| c.is_ascii_digit())
            && self
                .schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            bail!("Invalid schema name: {:?}", self.schema);
        }
        if RESERVED_SCHEMAS
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(&self.schema))
        {
            bail!("Schema name {:?} is reserved by SQLite", self.schema);
        }
        if self.registrant.trim().is_empty() {
            bail!("Registrant label cannot be empty");
        }
        Ok(())
    }
}
