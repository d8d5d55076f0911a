//! Per-call cache options

use serde::{Deserialize, Serialize};

/// Which query parameters take part in cache key derivation.
///
/// Deserializes from `false`, `true` or a list of parameter names, the same
/// shapes hosts already use in their JSON settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "QueryParamSetting", into = "QueryParamSetting")]
pub enum QueryParamPolicy {
    /// Query string is ignored; URLs differing only in the query share an entry.
    #[default]
    Ignore,
    /// Every query parameter is significant.
    All,
    /// Only the named parameters are significant.
    Only(Vec<String>),
}

impl QueryParamPolicy {
    /// Returns `true` if the parameter `name` takes part in the key.
    pub fn selects(&self, name: &str) -> bool {
        match self {
            QueryParamPolicy::Ignore => false,
            QueryParamPolicy::All => true,
            QueryParamPolicy::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

impl From<bool> for QueryParamPolicy {
    fn from(enabled: bool) -> Self {
        if enabled {
            QueryParamPolicy::All
        } else {
            QueryParamPolicy::Ignore
        }
    }
}

impl From<Vec<String>> for QueryParamPolicy {
    fn from(names: Vec<String>) -> Self {
        QueryParamPolicy::Only(names)
    }
}

impl From<&[&str]> for QueryParamPolicy {
    fn from(names: &[&str]) -> Self {
        QueryParamPolicy::Only(names.iter().map(|n| n.to_string()).collect())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum QueryParamSetting {
    Flag(bool),
    Names(Vec<String>),
}

impl From<QueryParamSetting> for QueryParamPolicy {
    fn from(setting: QueryParamSetting) -> Self {
        match setting {
            QueryParamSetting::Flag(enabled) => enabled.into(),
            QueryParamSetting::Names(names) => names.into(),
        }
    }
}

impl From<QueryParamPolicy> for QueryParamSetting {
    fn from(policy: QueryParamPolicy) -> Self {
        match policy {
            QueryParamPolicy::Ignore => QueryParamSetting::Flag(false),
            QueryParamPolicy::All => QueryParamSetting::Flag(true),
            QueryParamPolicy::Only(names) => QueryParamSetting::Names(names),
        }
    }
}

/// Options accepted by every URL-taking cache operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    pub use_query_params_in_cache_key: QueryParamPolicy,
    /// Directory name used instead of the one derived from the host.
    pub cache_group: Option<String>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_params(mut self, policy: impl Into<QueryParamPolicy>) -> Self {
        self.use_query_params_in_cache_key = policy.into();
        self
    }

    pub fn with_cache_group(mut self, group: impl Into<String>) -> Self {
        self.cache_group = Some(group.into());
        self
    }
}
