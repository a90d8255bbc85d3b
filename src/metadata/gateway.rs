//! IPFS gateway resolution.
//!
//! A [`GatewayList`] is the ordered set of HTTP gateways a content identifier
//! can be fetched through. Index 0 is the preferred gateway; later entries
//! are fallbacks tried in order.

use coursenft_common::{Error, Result};

/// URI scheme marking an identifier as content-addressed.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Gateways used when no configuration overrides them.
pub const DEFAULT_GATEWAYS: &[&str] = &[
    "https://ipfs.io/ipfs/",
    "https://cloudflare-ipfs.com/ipfs/",
    "https://gateway.pinata.cloud/ipfs/",
];

/// Remove a leading `ipfs://` from `uri`, if present.
///
/// # Examples
///
/// ```
/// use coursenft::metadata::gateway::strip_scheme;
///
/// assert_eq!(strip_scheme("ipfs://QmAbc/1.json"), "QmAbc/1.json");
/// assert_eq!(strip_scheme("QmAbc"), "QmAbc");
/// ```
pub fn strip_scheme(uri: &str) -> &str {
    uri.strip_prefix(IPFS_SCHEME).unwrap_or(uri)
}

/// Returns `true` when `uri` carries the `ipfs://` scheme.
pub fn has_ipfs_scheme(uri: &str) -> bool {
    uri.starts_with(IPFS_SCHEME)
}

/// Ordered, non-empty list of gateway base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayList {
    bases: Vec<String>,
}

impl GatewayList {
    /// Build a list from base URLs, in priority order.
    ///
    /// Each base gets a trailing `/` if it lacks one. Fails with
    /// [`Error::Config`] when `bases` is empty or any entry is blank.
    pub fn new<I, S>(bases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut normalized = Vec::new();
        for base in bases {
            let base: String = base.into();
            let base = base.trim();
            if base.is_empty() {
                return Err(Error::config("gateway URL cannot be empty"));
            }
            if base.ends_with('/') {
                normalized.push(base.to_string());
            } else {
                normalized.push(format!("{base}/"));
            }
        }

        if normalized.is_empty() {
            return Err(Error::config("no IPFS gateways configured"));
        }

        Ok(Self { bases: normalized })
    }

    /// Number of gateways.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base URL of gateway `index`.
    pub fn base(&self, index: usize) -> Option<&str> {
        self.bases.get(index).map(String::as_str)
    }

    /// Iterate over base URLs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(String::as_str)
    }

    /// Build the URL of bare identifier `cid` on gateway `index`.
    pub fn url_for(&self, cid: &str, index: usize) -> Option<String> {
        self.base(index).map(|base| format!("{base}{cid}"))
    }

    /// Strip the scheme from `uri` and build its URL on the primary gateway.
    pub fn primary_url(&self, uri: &str) -> String {
        format!("{}{}", self.bases[0], strip_scheme(uri))
    }
}

impl Default for GatewayList {
    fn default() -> Self {
        Self {
            bases: DEFAULT_GATEWAYS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
