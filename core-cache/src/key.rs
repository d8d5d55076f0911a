//! Cache key derivation
//!
//! A key is the lowercase SHA-1 hex digest of
//! `<directory with trailing slash><file name><resource type><query values>`
//! where the query part depends on [`QueryParamPolicy`]. The resource type
//! is also the file extension of the cached entry.

use crate::options::QueryParamPolicy;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Extensions recognised as video containers, matched case-insensitively.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "asf", "amv", "flv", "gif", "mp4", "mov", "mpg", "mkv", "m4v", "mpeg", "m2v", "mpv",
    "mng", "ogv", "ogg", "wmv", "3gp", "webm",
];

/// Resource type used when the URL has no recognised extension.
pub const DEFAULT_RESOURCE_TYPE: &str = "mp4";

/// Content address of one cached resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    resource_type: &'static str,
}

impl CacheKey {
    /// Derive the key for a parsed URL.
    pub fn derive(url: &Url, policy: &QueryParamPolicy) -> Self {
        let (directory, file_name) = split_path(url.path());
        let resource_type = resource_type_of(file_name);

        let mut hasher = Sha1::new();
        hasher.update(directory.as_bytes());
        hasher.update(file_name.as_bytes());
        hasher.update(resource_type.as_bytes());
        hasher.update(query_component(url, policy).as_bytes());

        Self {
            digest: hex::encode(hasher.finalize()),
            resource_type,
        }
    }

    /// 40 lowercase hex characters.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// `<digest>.<resource type>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.digest, self.resource_type)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// Split a URL path into its directory (trailing slash kept) and file name.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

/// Extension after the last dot of the file name if it is a known video
/// container, else [`DEFAULT_RESOURCE_TYPE`].
pub fn resource_type_of(file_name: &str) -> &'static str {
    file_name
        .rsplit_once('.')
        .and_then(|(_, ext)| {
            VIDEO_EXTENSIONS
                .iter()
                .copied()
                .find(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(DEFAULT_RESOURCE_TYPE)
}

/// Values of the selected query parameters, ordered by parameter name and
/// joined with `,`. The first occurrence of a repeated name wins.
fn query_component(url: &Url, policy: &QueryParamPolicy) -> String {
    if matches!(policy, QueryParamPolicy::Ignore) {
        return String::new();
    }

    let mut params = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params.entry(name).or_insert(value);
    }

    params
        .into_iter()
        .filter(|(name, _)| policy.selects(name))
        .map(|(_, value)| value)
        .collect::<Vec<_>>()
        .join(",")
}
