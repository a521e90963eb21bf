//! Configuration for the sweep and the graph builder.
//!
//! Both knobs are hardening options. The defaults reproduce the permissive
//! contract: unsorted input is not detected and disambiguation probing is
//! unbounded.
//!
//! ```json
//! { "ordering": "strict", "probe_limit": 1024 }
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How the sweep treats its sortedness precondition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Trust the caller. Unsorted or inverted records silently undercount.
    #[default]
    Permissive,
    /// Reject records whose start precedes the previous record's start,
    /// and records with `start > end`.
    Strict,
}

/// Options shared by [`run_sweep`](crate::sweep::run_sweep) and
/// [`build_graph`](crate::graph::build_graph).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    pub ordering: OrderingPolicy,
    /// Highest disambiguation index the builder may probe before giving up.
    /// `None` probes without bound.
    pub probe_limit: Option<usize>,
}

impl OverlapConfig {
    pub fn strict() -> Self {
        Self { ordering: OrderingPolicy::Strict, ..Self::default() }
    }

    pub fn with_probe_limit(mut self, limit: usize) -> Self {
        self.probe_limit = Some(limit);
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}
