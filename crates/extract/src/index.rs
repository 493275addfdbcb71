use std::collections::HashMap;

use serde_json::Value;

use crate::schema::Entity;

/// URN -> entity map over one response's `included` array.
///
/// Built once per response before any lookup. When two items share a URN
/// the later one wins.
#[derive(Debug, Default)]
pub struct LookupIndex {
    entities: HashMap<String, Entity>,
}

impl LookupIndex {
    pub fn build(included: &[Value]) -> Self {
        let mut entities = HashMap::with_capacity(included.len());
        for entity in included.iter().filter_map(Entity::from_value) {
            entities.insert(entity.urn.clone(), entity);
        }
        Self { entities }
    }

    /// Index the response's `included` array, or `None` if it is missing
    /// or not an array.
    pub fn from_response(response: &Value) -> Option<Self> {
        let included = response.get("included")?.as_array()?;
        Some(Self::build(included))
    }

    pub fn get(&self, urn: &str) -> Option<&Entity> {
        self.entities.get(urn)
    }

    /// Resolve `urn` and project it, short-circuiting on either miss.
    ///
    /// Chains compose left to right:
    /// `index.resolve(a, |e| e.attr_str("*next")).and_then(|b| index.resolve(b, ...))`.
    pub fn resolve<'a, T>(
        &'a self,
        urn: &str,
        project: impl FnOnce(&'a Entity) -> Option<T>,
    ) -> Option<T> {
        self.get(urn).and_then(project)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
