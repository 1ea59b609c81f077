use crate::Model;

use indexmap::IndexMap;
use std::{hash::Hash, ops::Index};
use tether_core::stmt::Value;

/// An ordered sequence of models.
///
/// A collection built in memory is new; one loaded from storage is not.
/// Primary key operations ignore models that have no key yet.
#[derive(Debug, Clone)]
pub struct Collection {
    models: Vec<Model>,
    is_new: bool,
}

impl Collection {
    pub fn new() -> Collection {
        Collection {
            models: vec![],
            is_new: true,
        }
    }

    /// A collection of models loaded from storage.
    pub(crate) fn fetched(models: Vec<Model>) -> Collection {
        Collection {
            models,
            is_new: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn first(&self) -> Option<&Model> {
        self.models.first()
    }

    pub fn push(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Model> {
        self.models.iter_mut()
    }

    pub fn into_vec(self) -> Vec<Model> {
        self.models
    }

    /// Primary keys of the models that have one, in order.
    pub fn primary_keys(&self) -> Vec<&Value> {
        self.models.iter().filter_map(Model::pk).collect()
    }

    pub fn contains_pk(&self, pk: &Value) -> bool {
        self.find_by_pk(pk).is_some()
    }

    pub fn find_by_pk(&self, pk: &Value) -> Option<&Model> {
        self.models.iter().find(|model| model.pk() == Some(pk))
    }

    /// Models of `self` whose primary key is not in `other`.
    pub fn difference_by_pk(&self, other: &Collection) -> Collection {
        self.models
            .iter()
            .filter(|model| match model.pk() {
                Some(pk) => !other.contains_pk(pk),
                None => true,
            })
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Splits the collection into the models matching `f` and the rest.
    pub fn partition(self, f: impl Fn(&Model) -> bool) -> (Collection, Collection) {
        let is_new = self.is_new;
        let (matching, rest): (Vec<_>, Vec<_>) = self.models.into_iter().partition(|m| f(m));

        (
            Collection {
                models: matching,
                is_new,
            },
            Collection {
                models: rest,
                is_new,
            },
        )
    }

    /// Groups models by the key `f` returns, keeping first-seen key order.
    pub fn group<K: Hash + Eq>(self, f: impl Fn(&Model) -> K) -> IndexMap<K, Collection> {
        let is_new = self.is_new;
        let mut groups: IndexMap<K, Collection> = IndexMap::new();

        for model in self.models {
            groups
                .entry(f(&model))
                .or_insert_with(|| Collection {
                    models: vec![],
                    is_new,
                })
                .push(model);
        }

        groups
    }
}

impl Default for Collection {
    fn default() -> Self {
        Collection::new()
    }
}

impl From<Vec<Model>> for Collection {
    fn from(models: Vec<Model>) -> Self {
        Collection {
            models,
            is_new: true,
        }
    }
}

impl FromIterator<Model> for Collection {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl IntoIterator for Collection {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl<'a> IntoIterator for &'a mut Collection {
    type Item = &'a mut Model;
    type IntoIter = std::slice::IterMut<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter_mut()
    }
}

impl Index<usize> for Collection {
    type Output = Model;

    fn index(&self, index: usize) -> &Model {
        &self.models[index]
    }
}
