//! Datastore keys
//!
//! A [`Key`] names one entity in the backend: the owning application, an
//! optional namespace, and an ancestor path of `(kind, id)` elements. The
//! last element may be incomplete (no id or name yet) for entities whose id
//! the backend assigns on write; such keys can be put but never deleted.
//!
//! ## String form
//!
//! `Key::encode()` produces a URL-safe base64 string of the key's bincode
//! form. `Key::decode()` (also `FromStr`) accepts exactly that string and
//! rejects anything else with `InvalidArgument`. `Display` prints the
//! encoded string, so `key.to_string().parse::<Key>()` yields the same key.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of the last component of a key path element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyId {
    /// Not yet assigned; the backend allocates an id on put
    Incomplete,
    /// Numeric id (always positive)
    Id(i64),
    /// Application-chosen name (never empty)
    Name(String),
}

impl KeyId {
    /// True unless this is `KeyId::Incomplete`
    pub fn is_complete(&self) -> bool {
        !matches!(self, KeyId::Incomplete)
    }
}

impl From<i64> for KeyId {
    fn from(id: i64) -> Self {
        KeyId::Id(id)
    }
}

impl From<&str> for KeyId {
    fn from(name: &str) -> Self {
        KeyId::Name(name.to_string())
    }
}

impl From<String> for KeyId {
    fn from(name: String) -> Self {
        KeyId::Name(name)
    }
}

/// One `(kind, id)` step of a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathElement {
    /// Entity kind
    pub kind: String,
    /// Id or name within the kind
    pub id: KeyId,
}

impl PathElement {
    /// Create a path element
    pub fn new(kind: impl Into<String>, id: impl Into<KeyId>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Canonical key of a backend entity
///
/// # Examples
///
/// ```
/// use strata_batch_core::Key;
///
/// let key = Key::from_path("myapp", "MyKind", "MyKeyName");
/// let encoded = key.encode().unwrap();
/// assert_eq!(Key::decode(&encoded).unwrap(), key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    app: String,
    namespace: Option<String>,
    path: Vec<PathElement>,
}

impl Key {
    /// Create a root key with a single path element
    pub fn from_path(app: impl Into<String>, kind: impl Into<String>, id: impl Into<KeyId>) -> Self {
        Self {
            app: app.into(),
            namespace: None,
            path: vec![PathElement::new(kind, id)],
        }
    }

    /// Create a root key whose id the backend will assign
    pub fn incomplete(app: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::from_path(app, kind, KeyId::Incomplete)
    }

    /// Create a key for a child entity under this key
    pub fn child(&self, kind: impl Into<String>, id: impl Into<KeyId>) -> Self {
        let mut path = self.path.clone();
        path.push(PathElement::new(kind, id));
        Self {
            app: self.app.clone(),
            namespace: self.namespace.clone(),
            path,
        }
    }

    /// Place this key in a namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Owning application id
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Full ancestor path, root first
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// Kind of the entity this key names
    pub fn kind(&self) -> &str {
        self.path.last().map(|e| e.kind.as_str()).unwrap_or("")
    }

    /// Id of the entity this key names
    pub fn id(&self) -> &KeyId {
        self.path
            .last()
            .map(|e| &e.id)
            .unwrap_or(&KeyId::Incomplete)
    }

    /// Key of the parent entity, `None` for root keys
    pub fn parent(&self) -> Option<Key> {
        if self.path.len() < 2 {
            return None;
        }
        Some(Self {
            app: self.app.clone(),
            namespace: self.namespace.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }

    /// True when every path element has an id or name
    pub fn is_complete(&self) -> bool {
        !self.path.is_empty() && self.path.iter().all(|e| e.id.is_complete())
    }

    /// Check the key is well formed; the last element may be incomplete
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty app or path, an empty kind,
    /// an incomplete ancestor, a non-positive id, or an empty name.
    pub fn validate(&self) -> Result<()> {
        if self.app.is_empty() {
            return Err(Error::invalid_argument("key has an empty app id"));
        }
        if self.path.is_empty() {
            return Err(Error::invalid_argument("key has an empty path"));
        }
        let last = self.path.len() - 1;
        for (i, element) in self.path.iter().enumerate() {
            if element.kind.is_empty() {
                return Err(Error::invalid_argument("key path element has an empty kind"));
            }
            match &element.id {
                KeyId::Incomplete if i != last => {
                    return Err(Error::invalid_argument(format!(
                        "ancestor '{}' of key is incomplete",
                        element.kind
                    )));
                }
                KeyId::Id(id) if *id <= 0 => {
                    return Err(Error::invalid_argument(format!(
                        "key id must be positive, got {}",
                        id
                    )));
                }
                KeyId::Name(name) if name.is_empty() => {
                    return Err(Error::invalid_argument("key name must not be empty"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Check the key is well formed and complete
    ///
    /// # Errors
    ///
    /// Everything `validate` rejects, plus keys whose last element has no
    /// id or name.
    pub fn validate_complete(&self) -> Result<()> {
        self.validate()?;
        if !self.is_complete() {
            return Err(Error::invalid_argument(format!(
                "key of kind '{}' is incomplete",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Canonical binary form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Size in bytes of the canonical binary form
    pub fn encoded_size(&self) -> Result<usize> {
        Ok(bincode::serialized_size(self)? as usize)
    }

    /// URL-safe string form of the key
    pub fn encode(&self) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_bytes()?))
    }

    /// Parse a string produced by `encode`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the string is not valid base64, does
    /// not hold a key, has trailing bytes, or holds a malformed key.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim())?;
        let key: Key = bincode::deserialize(&bytes)
            .map_err(|e| Error::invalid_argument(format!("malformed key string: {}", e)))?;
        if key.encoded_size()? != bytes.len() {
            return Err(Error::invalid_argument(
                "malformed key string: trailing bytes",
            ));
        }
        key.validate()?;
        Ok(key)
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Key::decode(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.encode().map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}
