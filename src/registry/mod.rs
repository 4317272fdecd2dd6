//! Project resource database.
//!
//! Flat, typed registry of resource identifiers: the authoritative record of
//! which resources exist. The tree is a view over this database plus the
//! on-disk files; id renames go through the database first.

pub mod persistence;

use crate::error::RegistryError;
use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared metadata for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Human-readable description shown by the editor.
    #[serde(default)]
    pub description: String,
}

impl ResourceDeclaration {
    pub fn described(description: &str) -> Self {
        Self {
            description: description.to_string(),
        }
    }
}

/// Port consumed by the relocation engine: atomic id rename within one
/// type's namespace.
pub trait ResourceRegistry {
    fn contains(&self, kind: ResourceType, id: &str) -> bool;

    /// Atomically rename `old_id` to `new_id` within `kind`'s namespace.
    /// Rejects when `new_id` already exists or `old_id` does not; the
    /// registry is unchanged on rejection.
    fn move_resource(
        &mut self,
        kind: ResourceType,
        old_id: &str,
        new_id: &str,
    ) -> Result<(), RegistryError>;
}

/// In-memory project database, keyed by type then id. BTreeMap keeps ids in
/// deterministic order for tree building and persistence.
#[derive(Debug, Clone, Default)]
pub struct ProjectDatabase {
    resources: BTreeMap<ResourceType, BTreeMap<String, ResourceDeclaration>>,
}

impl ProjectDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new resource. Rejects a duplicate id within the type.
    pub fn declare(
        &mut self,
        kind: ResourceType,
        id: &str,
        declaration: ResourceDeclaration,
    ) -> Result<(), RegistryError> {
        let per_type = self.resources.entry(kind).or_default();
        if per_type.contains_key(id) {
            return Err(RegistryError::AlreadyExists {
                kind,
                id: id.to_string(),
            });
        }
        per_type.insert(id.to_string(), declaration);
        Ok(())
    }

    /// Remove a resource, returning its declaration.
    pub fn remove(
        &mut self,
        kind: ResourceType,
        id: &str,
    ) -> Result<ResourceDeclaration, RegistryError> {
        self.resources
            .get_mut(&kind)
            .and_then(|per_type| per_type.remove(id))
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    pub fn get(&self, kind: ResourceType, id: &str) -> Option<&ResourceDeclaration> {
        self.resources.get(&kind).and_then(|per_type| per_type.get(id))
    }

    pub fn contains(&self, kind: ResourceType, id: &str) -> bool {
        self.get(kind, id).is_some()
    }

    /// Ids of one type, in deterministic (lexicographic) order.
    pub fn ids_of(&self, kind: ResourceType) -> Vec<&str> {
        self.resources
            .get(&kind)
            .map(|per_type| per_type.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn count_of(&self, kind: ResourceType) -> usize {
        self.resources.get(&kind).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceRegistry for ProjectDatabase {
    fn contains(&self, kind: ResourceType, id: &str) -> bool {
        ProjectDatabase::contains(self, kind, id)
    }

    fn move_resource(
        &mut self,
        kind: ResourceType,
        old_id: &str,
        new_id: &str,
    ) -> Result<(), RegistryError> {
        let per_type = self.resources.entry(kind).or_default();
        if per_type.contains_key(new_id) {
            return Err(RegistryError::AlreadyExists {
                kind,
                id: new_id.to_string(),
            });
        }
        let declaration = per_type.remove(old_id).ok_or_else(|| RegistryError::NotFound {
            kind,
            id: old_id.to_string(),
        })?;
        per_type.insert(new_id.to_string(), declaration);
        Ok(())
    }
}
