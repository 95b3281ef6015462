use crate::core::FieldId;
use crate::inputs::input::{InputHandle, MemoryInput};
use indexmap::IndexMap;

/// Field name to input handle, in binding order.
#[derive(Default)]
pub struct FieldRegistry {
    handles: IndexMap<FieldId, Box<dyn InputHandle>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            handles: IndexMap::new(),
        }
    }

    /// One empty [`MemoryInput`] per id.
    pub fn with_memory_inputs<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FieldId>,
    {
        let mut registry = Self::new();
        for id in ids {
            registry.bind(id, Box::new(MemoryInput::new()));
        }
        registry
    }

    /// Binds `handle` to `id`, returning the handle it replaced.
    pub fn bind(
        &mut self,
        id: impl Into<FieldId>,
        handle: Box<dyn InputHandle>,
    ) -> Option<Box<dyn InputHandle>> {
        self.handles.insert(id.into(), handle)
    }

    pub fn get(&self, id: &str) -> Option<&dyn InputHandle> {
        self.handles.get(id).map(|handle| &**handle)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn InputHandle + 'static)> {
        self.handles.get_mut(id).map(|handle| &mut **handle)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.handles.keys()
    }

    pub fn value(&self, id: &str) -> Option<String> {
        self.get(id).map(|handle| handle.value())
    }

    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.get_mut(id) {
            Some(handle) => {
                handle.set_value(value);
                true
            }
            None => false,
        }
    }

    pub fn is_invalid(&self, id: &str) -> bool {
        self.get(id).is_some_and(|handle| handle.is_invalid())
    }

    pub fn set_invalid(&mut self, id: &str, invalid: bool) {
        if let Some(handle) = self.get_mut(id) {
            handle.set_invalid(invalid);
        }
    }

    pub fn invalid_ids(&self) -> Vec<FieldId> {
        self.handles
            .iter()
            .filter(|(_, handle)| handle.is_invalid())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Current `(name, value)` pairs in binding order.
    pub fn values(&self) -> Vec<(FieldId, String)> {
        self.handles
            .iter()
            .map(|(id, handle)| (id.clone(), handle.value()))
            .collect()
    }
}
