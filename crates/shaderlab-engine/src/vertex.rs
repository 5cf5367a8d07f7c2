//! Vertex store entries.

use std::collections::BTreeMap;

use crate::attribute::AttributeId;
use crate::value::GlVariable;

/// One vertex: a value per attribute of the schema, keyed by attribute id.
///
/// Only `Core` inserts and removes keys, keeping every vertex's key set equal to
/// the schema's id set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    values: BTreeMap<AttributeId, GlVariable>,
}

impl Vertex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: AttributeId) -> Option<&GlVariable> {
        self.values.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: AttributeId) -> bool {
        self.values.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.values.keys().copied()
    }

    pub(crate) fn get_mut(&mut self, id: AttributeId) -> Option<&mut GlVariable> {
        self.values.get_mut(&id)
    }

    pub(crate) fn insert(&mut self, id: AttributeId, value: GlVariable) {
        self.values.insert(id, value);
    }

    /// Missing keys are tolerated.
    pub(crate) fn remove(&mut self, id: AttributeId) -> Option<GlVariable> {
        self.values.remove(&id)
    }
}
