//! SWC plugin that wraps React components in `observer(...)` from
//! `mobx-react`, so components re-render when the observables they read
//! change.
//!
//! Every function, arrow, or class in a module is classified structurally. A
//! component that is not yet wrapped gets wrapped, and a single
//! `import { observer } from "mobx-react"` is added or merged once the module
//! holds any component bound to `observer`, including ones it already wrapped.
//!
//! ```js
//! const Greeting = () => <div>hi</div>;
//! // becomes
//! import { observer } from "mobx-react";
//! const Greeting = observer(() => <div>hi</div>);
//! ```
//!
//! Opt out with `// @auto-observer-ignore-file` anywhere in a module, or with
//! `// @auto-observer-ignore-block` (suppresses the statement holding it, or the
//! next one, and every following statement of the same list).
//!
//! # Pipeline ordering
//!
//! Classes decorated with `@observer` are left as they are. Legacy decorator
//! lowering has to run after this plugin; once it has, its output
//! (`observer(_class = class ..)`) is recognised as already wrapped.

use swc_core::{
    common::{errors::HANDLER, SourceMapper},
    ecma::{ast::*, visit::VisitMutWith},
    plugin::{
        metadata::TransformPluginMetadataContextKind, plugin_transform,
        proxies::TransformPluginProgramMetadata,
    },
};

/// `tracing::debug!` under the `auto_observer` target, only when `debugEnabled`
/// is set in the given [`Config`].
macro_rules! debug_log {
    ($config:expr, $($arg:tt)+) => {
        if $config.debug_enabled {
            ::tracing::debug!(target: "auto_observer", $($arg)+);
        }
    };
}

pub mod classify;
pub mod config;
pub mod error;
pub mod imports;
pub mod pragma;
pub mod rewrite;
pub mod transform;
pub mod wrap_state;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{Error, Result};
pub use transform::{auto_observer, AutoObserver};

// -----------------------------------------------------------------------------
// Filename helpers
// -----------------------------------------------------------------------------

/// Normalize bundler/debugger style filenames.
pub(crate) fn normalize_filename(filename: &str) -> String {
    let mut s = filename.replace('\\', "/");
    s = s.replace("%5Bproject%5D", "[project]");
    s = s.replace("%5bproject%5d", "[project]");
    if let Some(rest) = s.strip_prefix("file:///") {
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix("file://") {
        s = rest.to_string();
    }
    for prefix in &["turbopack/[project]/", "/turbopack/[project]/", "[project]/"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    s
}

pub fn is_in_node_modules(filename: &str) -> bool {
    normalize_filename(filename)
        .split('/')
        .any(|segment| segment == "node_modules")
}

// -----------------------------------------------------------------------------
// Plugin entry
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = match metadata
        .get_transform_plugin_config()
        .map(|raw| Config::from_json(&raw))
        .transpose()
    {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            HANDLER.with(|handler| handler.err(&err.to_string()));
            return program;
        }
    };

    if config.skip_node_modules {
        let filename = metadata.get_context(&TransformPluginMetadataContextKind::Filename);
        if filename.as_deref().is_some_and(is_in_node_modules) {
            debug_log!(
                config,
                filename = filename.as_deref().unwrap_or_default(),
                "skipping node_modules file"
            );
            return program;
        }
    }

    let source_map: Option<std::sync::Arc<dyn SourceMapper>> =
        Some(std::sync::Arc::new(metadata.source_map));
    let mut transform = AutoObserver::new(config, metadata.comments, source_map);
    program.visit_mut_with(&mut transform);
    program
}
