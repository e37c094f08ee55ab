//! Entity arena keyed by identity token.
//!
//! Resources never own each other; they reference siblings with `urn:uuid:<id>` references that
//! resolve through the arena. Insertion order is kept so a rebuilt bundle lists entries in the
//! order they were created or restored.

use fhir::{Composition, Location, Observation, Patient, Practitioner, Procedure, RelatedPerson, Resource};
use std::collections::HashMap;
use vital_uuid::ResourceId;

/// Typed access to a resource variant stored in the arena.
pub trait ArenaResource: Sized {
    fn from_resource(resource: &Resource) -> Option<&Self>;
    fn take_from(resource: Resource) -> Result<Self, Resource>;
    fn into_resource(self) -> Resource;
    fn set_id(&mut self, id: &str);
}

macro_rules! arena_resource {
    ($ty:ident) => {
        impl ArenaResource for $ty {
            fn from_resource(resource: &Resource) -> Option<&Self> {
                match resource {
                    Resource::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn take_from(resource: Resource) -> Result<Self, Resource> {
                match resource {
                    Resource::$ty(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn into_resource(self) -> Resource {
                Resource::$ty(self)
            }

            fn set_id(&mut self, id: &str) {
                self.id = Some(id.to_string());
            }
        }
    };
}

arena_resource!(Composition);
arena_resource!(Location);
arena_resource!(Observation);
arena_resource!(Patient);
arena_resource!(Practitioner);
arena_resource!(Procedure);
arena_resource!(RelatedPerson);

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub full_url: String,
    pub resource: Resource,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

impl Arena {
    /// Adds a new resource under a freshly minted identity token and returns the token.
    pub fn create<T: ArenaResource>(&mut self, mut resource: T) -> String {
        let id = ResourceId::new().to_string();
        resource.set_id(&id);
        self.insert(id.clone(), vital_uuid::full_url(&id), resource.into_resource());
        id
    }

    /// Inserts (or replaces in place) a resource under `id`.
    pub fn insert(&mut self, id: String, full_url: String, resource: Resource) {
        if !self.entries.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.entries.insert(id, Entry { full_url, resource });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get<T: ArenaResource>(&self, id: &str) -> Option<&T> {
        self.entries
            .get(id)
            .and_then(|entry| T::from_resource(&entry.resource))
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.entries.get(id).map(|entry| &entry.resource)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Runs `edit` against the typed resource stored under `id`.
    ///
    /// Returns `None` (and leaves the arena untouched) if `id` is unknown or holds a different
    /// resource type.
    pub fn edit<T: ArenaResource, R>(&mut self, id: &str, edit: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entry = self.entries.get_mut(id)?;
        let placeholder = Resource::Other(serde_json::Value::Null);
        let resource = std::mem::replace(&mut entry.resource, placeholder);
        match T::take_from(resource) {
            Ok(mut typed) => {
                let result = edit(&mut typed);
                entry.resource = typed.into_resource();
                Some(result)
            }
            Err(original) => {
                entry.resource = original;
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        if self.entries.remove(id).is_some() {
            self.order.retain(|existing| existing != id);
        }
    }

    /// Identity tokens in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_canonical_tokens() {
        let mut arena = Arena::default();
        let id = arena.create(Patient::default());

        assert!(ResourceId::is_canonical(&id));
        let patient = arena.get::<Patient>(&id).expect("patient");
        assert_eq!(patient.id.as_deref(), Some(id.as_str()));
        assert_eq!(arena.entry(&id).map(|e| e.full_url.clone()), Some(format!("urn:uuid:{id}")));
    }

    #[test]
    fn edit_mutates_in_place_and_rejects_wrong_types() {
        let mut arena = Arena::default();
        let first = arena.create(Patient::default());
        let second = arena.create(Practitioner::default());

        let edited = arena.edit::<Patient, _>(&first, |p| p.gender = Some("female".into()));
        assert!(edited.is_some());
        assert_eq!(
            arena.get::<Patient>(&first).and_then(|p| p.gender.as_deref()),
            Some("female")
        );

        assert!(arena.edit::<Patient, _>(&second, |_| ()).is_none());
        assert!(arena.get::<Practitioner>(&second).is_some());

        let ids: Vec<_> = arena.ids().collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut arena = Arena::default();
        let a = arena.create(Observation::default());
        let b = arena.create(Observation::default());
        arena.remove(&a);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![b.as_str()]);
        assert!(!arena.contains(&a));
    }
}
