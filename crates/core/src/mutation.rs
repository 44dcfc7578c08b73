//! Input shapes accepted by the mutation pool
//!
//! `put` and `delete` accept a small closed set of input forms. Each form
//! is normalized here into the one canonical type the pool buffers: an
//! [`Entity`] for puts and a complete [`Key`] for deletes.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::traits::Model;

/// Something that can be written
pub enum PutInput<'a> {
    /// Model instance, serialized through its `to_entity` hook
    Model(&'a dyn Model),
    /// Pre-serialized entity, buffered as-is
    Entity(Entity),
}

impl<'a> PutInput<'a> {
    /// Wrap a model instance
    pub fn model(model: &'a dyn Model) -> Self {
        PutInput::Model(model)
    }

    /// Convert to the canonical, validated entity
    ///
    /// # Errors
    ///
    /// Returns the model's serialization error, or `InvalidArgument` if the
    /// resulting entity is malformed.
    pub fn into_entity(self) -> Result<Entity> {
        let entity = match self {
            PutInput::Model(model) => model.to_entity()?,
            PutInput::Entity(entity) => entity,
        };
        entity.validate()?;
        Ok(entity)
    }
}

impl From<Entity> for PutInput<'_> {
    fn from(entity: Entity) -> Self {
        PutInput::Entity(entity)
    }
}

impl From<&Entity> for PutInput<'_> {
    fn from(entity: &Entity) -> Self {
        PutInput::Entity(entity.clone())
    }
}

/// Something that names an entity to delete
pub enum DeleteTarget<'a> {
    /// Model instance; its key is used
    Model(&'a dyn Model),
    /// Raw entity; its key is used
    Entity(&'a Entity),
    /// Key object
    Key(Key),
    /// String produced by `Key::encode`
    Encoded(&'a str),
}

impl<'a> DeleteTarget<'a> {
    /// Wrap a model instance
    pub fn model(model: &'a dyn Model) -> Self {
        DeleteTarget::Model(model)
    }

    /// Convert to the canonical key
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for malformed key strings and for keys
    /// that are incomplete (nothing to delete yet).
    pub fn into_key(self) -> Result<Key> {
        let key = match self {
            DeleteTarget::Model(model) => model.key(),
            DeleteTarget::Entity(entity) => entity.key().clone(),
            DeleteTarget::Key(key) => key,
            DeleteTarget::Encoded(encoded) => Key::decode(encoded)?,
        };
        key.validate_complete().map_err(|e| match e {
            Error::InvalidArgument(msg) => {
                Error::invalid_argument(format!("cannot delete: {}", msg))
            }
            other => other,
        })?;
        Ok(key)
    }
}

impl<'a> From<&'a Entity> for DeleteTarget<'a> {
    fn from(entity: &'a Entity) -> Self {
        DeleteTarget::Entity(entity)
    }
}

impl From<Key> for DeleteTarget<'_> {
    fn from(key: Key) -> Self {
        DeleteTarget::Key(key)
    }
}

impl From<&Key> for DeleteTarget<'_> {
    fn from(key: &Key) -> Self {
        DeleteTarget::Key(key.clone())
    }
}

impl<'a> From<&'a str> for DeleteTarget<'a> {
    fn from(encoded: &'a str) -> Self {
        DeleteTarget::Encoded(encoded)
    }
}

impl<'a> From<&'a String> for DeleteTarget<'a> {
    fn from(encoded: &'a String) -> Self {
        DeleteTarget::Encoded(encoded.as_str())
    }
}
