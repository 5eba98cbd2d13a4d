use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_WRAP_SYMBOL: &str = "observer";
pub const DEFAULT_WRAP_SOURCE: &str = "mobx-react";

/// Plugin options, read from the JSON object handed over by the host
/// (`["swc_plugin_auto_observer", { "debugEnabled": true }]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Emit `tracing` diagnostics for every classification decision.
    pub debug_enabled: bool,
    /// Identifier of the wrap call, also the imported specifier name.
    pub wrap_symbol_name: String,
    /// Module the wrap symbol is imported from.
    pub wrap_source_module: String,
    /// Leave files under `node_modules` alone.
    pub skip_node_modules: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug_enabled: false,
            wrap_symbol_name: DEFAULT_WRAP_SYMBOL.to_string(),
            wrap_source_module: DEFAULT_WRAP_SOURCE.to_string(),
            skip_node_modules: true,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }
}
