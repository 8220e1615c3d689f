//! Panel configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{CHAT_OPEN_HEIGHT_PX, DEFAULT_COLUMNS, DEFAULT_ROWS, MAX_DOCUMENT_CELLS};
use crate::error::ConfigError;
use crate::palette::PaletteName;

pub const CHAT_HEIGHT_ENV: &str = "SWATCHBOARD_CHAT_HEIGHT";
pub const PALETTE_ENV: &str = "SWATCHBOARD_PALETTE";
pub const COLUMNS_ENV: &str = "SWATCHBOARD_COLUMNS";
pub const ROWS_ENV: &str = "SWATCHBOARD_ROWS";
pub const LOG_ENV: &str = "SWATCHBOARD_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Chat region height in pixels while open.
    pub chat_height: u32,
    /// Palette installed at startup.
    pub palette: PaletteName,
    pub columns: usize,
    pub rows: usize,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            chat_height: CHAT_OPEN_HEIGHT_PX,
            palette: PaletteName::Default,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl PanelConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SWATCHBOARD_CHAT_HEIGHT`: default 240
    /// - `SWATCHBOARD_PALETTE`: `default` (default) or `zx`
    /// - `SWATCHBOARD_COLUMNS`: default 80
    /// - `SWATCHBOARD_ROWS`: default 25
    /// - `SWATCHBOARD_LOG`: default `info`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a set but unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a set but unparseable value,
    /// or for a grid larger than [`MAX_DOCUMENT_CELLS`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            chat_height: parse_or(CHAT_HEIGHT_ENV, get(CHAT_HEIGHT_ENV).as_deref(), defaults.chat_height)?,
            palette: parse_or(PALETTE_ENV, get(PALETTE_ENV).as_deref(), defaults.palette)?,
            columns: parse_or(COLUMNS_ENV, get(COLUMNS_ENV).as_deref(), defaults.columns)?,
            rows: parse_or(ROWS_ENV, get(ROWS_ENV).as_deref(), defaults.rows)?,
            log_filter: get(LOG_ENV).unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field limits after every override has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] keyed on the grid when
    /// `columns * rows` overflows or exceeds [`MAX_DOCUMENT_CELLS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.columns.checked_mul(self.rows) {
            Some(cells) if cells <= MAX_DOCUMENT_CELLS => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                key: format!("{COLUMNS_ENV}*{ROWS_ENV}"),
                value: format!("{}x{}", self.columns, self.rows),
            }),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { key: key.to_owned(), value: raw.to_owned() })
}
