use std::{collections::BTreeMap, net::SocketAddr, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use refid_model::{OverflowPolicy, ReportTypeSpec};
use refid_observe::LoggerConfig;
use refid_store::SqliteStoreConfig;

/// Daemon configuration, read from the JSON file given as the first argument.
///
/// ```json
/// {
///   "listen": "0.0.0.0:8080",
///   "logger": {"format": "json", "level": "refid_core=debug,info"},
///   "store": {"path": "/var/lib/refid/counters.db", "busyTimeoutMs": 2000},
///   "overflow": "reject",
///   "seed": {"fatality": "FT-00213"}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceConfig {
    pub listen: SocketAddr,
    pub logger: LoggerConfig,
    pub store: SqliteStoreConfig,
    pub overflow: OverflowPolicy,
    pub report_types: Vec<ReportTypeSpec>,
    /// Last identifier issued per report type before the counter store existed.
    pub seed: BTreeMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            logger: LoggerConfig::default(),
            store: SqliteStoreConfig::default(),
            overflow: OverflowPolicy::default(),
            report_types: ReportTypeSpec::builtin(),
            seed: BTreeMap::new(),
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
