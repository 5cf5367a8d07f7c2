//! Attribute schema: the ordered set of per-vertex inputs owned by a `Core`.

use std::collections::HashSet;

use crate::attribute::{AttributeId, AttributeInfo};
use crate::error::CoreError;

/// Attributes in the order they were added, plus every id this schema has retired.
///
/// Packing follows insertion order, not id order. Once removed, an id can never be
/// added back.
#[derive(Debug, Default)]
pub(crate) struct AttributeSchema {
    entries: Vec<AttributeInfo>,
    retired: HashSet<AttributeId>,
}

impl AttributeSchema {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, id: AttributeId) -> bool {
        self.entries.iter().any(|a| a.id() == id)
    }

    pub(crate) fn get(&self, id: AttributeId) -> Option<&AttributeInfo> {
        self.entries.iter().find(|a| a.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: AttributeId) -> Option<&mut AttributeInfo> {
        self.entries.iter_mut().find(|a| a.id() == id)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, AttributeInfo> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, AttributeInfo> {
        self.entries.iter_mut()
    }

    /// Appends `info`. Fails if its id is present or was removed earlier.
    pub(crate) fn insert(&mut self, info: AttributeInfo) -> Result<(), CoreError> {
        let id = info.id();
        if self.retired.contains(&id) || self.contains(id) {
            return Err(CoreError::DuplicateAttribute(id));
        }
        self.entries.push(info);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: AttributeId) -> Option<AttributeInfo> {
        let index = self.entries.iter().position(|a| a.id() == id)?;
        self.retired.insert(id);
        Some(self.entries.remove(index))
    }
}
