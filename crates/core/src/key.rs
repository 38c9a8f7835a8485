//! Hierarchical keys
//!
//! A [`Key`] is a slash-delimited path such as `/users/alice/profile`.
//! Every key is held in normalized form:
//! - always starts with `/`
//! - no trailing slash, except for the root key `/`
//! - no empty segments (`//` collapses)
//! - `.` segments are dropped and `..` removes the previous segment
//!
//! Equality and ordering are byte-wise on the normalized string.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Normalized, path-like identifier for a stored value
///
/// # Examples
///
/// ```
/// use datastore_core::Key;
///
/// let key = Key::new("users//alice/./profile/");
/// assert_eq!(key.as_str(), "/users/alice/profile");
/// assert_eq!(key.name(), "profile");
/// assert_eq!(key.parent().as_str(), "/users/alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Key(String);

impl Key {
    /// Create a key from any path-like string, normalizing it
    pub fn new(path: impl AsRef<str>) -> Self {
        Key(clean(path.as_ref()))
    }

    /// Create a key from a string that is already normalized
    ///
    /// Unlike [`Key::new`] this never rewrites its input; a string that is not
    /// in normalized form is rejected with [`Error::InvalidKey`].
    ///
    /// ```
    /// use datastore_core::Key;
    ///
    /// assert!(Key::raw("/a/b").is_ok());
    /// assert!(Key::raw("/a/b/").is_err());
    /// assert!(Key::raw("a").is_err());
    /// ```
    pub fn raw(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if clean(&path) == path {
            Ok(Key(path))
        } else {
            Err(Error::InvalidKey {
                key: path,
                reason: "key is not in normalized form".to_string(),
            })
        }
    }

    /// The root key `/`
    pub fn root() -> Self {
        Key("/".to_string())
    }

    /// Normalized string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes of the normalized string form
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether this is the root key
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, in order. The root key has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last segment, or `""` for the root key
    pub fn name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => "",
        }
    }

    /// Parent key. The parent of the root is the root.
    pub fn parent(&self) -> Key {
        match self.0.rfind('/') {
            Some(0) | None => Key::root(),
            Some(idx) => Key(self.0[..idx].to_string()),
        }
    }

    /// Key formed by appending `name` (which may itself contain `/`)
    ///
    /// The result is normalized like [`Key::new`], so `.` and `..` segments
    /// in `name` are resolved: `child("..")` is the parent, not a child.
    /// Use [`Key::is_descendant_of`] to check the result when `name` is
    /// untrusted.
    pub fn child(&self, name: impl AsRef<str>) -> Key {
        Key::new(format!("{}/{}", self.0, name.as_ref()))
    }

    /// True if a single segment sits below the root
    pub fn is_top_level(&self) -> bool {
        self.segments().count() == 1
    }

    /// True if `other` lives strictly below this key
    pub fn is_ancestor_of(&self, other: &Key) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// True if this key lives strictly below `other`
    pub fn is_descendant_of(&self, other: &Key) -> bool {
        other.is_ancestor_of(self)
    }

    /// Segment-aware prefix test
    ///
    /// `/a` is a prefix of `/a` and `/a/b` but not of `/ab`.
    pub fn has_prefix(&self, prefix: &Key) -> bool {
        self == prefix || prefix.is_ancestor_of(self)
    }
}

/// Lexical path normalization
fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }

    if parts.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    out
}

impl Default for Key {
    fn default() -> Self {
        Key::root()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(path: &str) -> Self {
        Key::new(path)
    }
}

impl From<String> for Key {
    fn from(path: String) -> Self {
        Key::new(path)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}
