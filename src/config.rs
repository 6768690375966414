use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;

use crate::ir::symbol_table::DuplicatePolicy;
use crate::logging::init_logger;

/// Settings of a front end run. Every field has a default, so a partial (or
/// empty) JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Policy for a name registered twice in one scope.
    pub duplicate_policy: DuplicatePolicy,
    /// Name of the scope enclosing every namespace scope.
    pub global_scope_name: String,
    /// Log filter, e.g. `"debug"` or `"thorium_frontend=trace"`. Falls back to
    /// `RUST_LOG` when unset.
    pub log_level: Option<String>,
    /// Whether the standard pipeline normalizes union and intersection types.
    pub flatten_types: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        FrontendConfig {
            duplicate_policy: DuplicatePolicy::Reject,
            global_scope_name: "global".to_string(),
            log_level: None,
            flatten_types: true,
        }
    }
}

impl FrontendConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Installs the global logger filtered by `log_level`.
    /// See [`init_logger`] for the meaning of the other arguments.
    pub fn init_logging(&self, no_color: bool, log_file: Option<&Path>) -> io::Result<WorkerGuard> {
        init_logger(no_color, self.log_level.as_deref(), log_file)
    }
}
