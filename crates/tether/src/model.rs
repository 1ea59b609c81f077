use crate::{Related, Slot};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use tether_core::{
    schema::{self, ModelId, RelationKind},
    stmt::{Row, Value},
    Error, Result, Schema,
};

static NULL: Value = Value::Null;

/// An instance of a schema model.
///
/// A model maps column names to values and holds one relation slot per
/// declared relation. Attributes that are not columns of the model (pivot
/// values loaded through a many-to-many relation) are kept alongside the
/// columns but never written to the model's table.
#[derive(Clone)]
pub struct Model {
    schema: Arc<Schema>,

    id: ModelId,

    /// Column values and extra attributes, in load order
    pub(crate) values: IndexMap<String, Value>,

    /// True until the model is first persisted
    pub(crate) is_new: bool,

    pub(crate) slots: IndexMap<String, Slot>,
}

impl Model {
    /// Creates a blank instance with every relation slot unresolved.
    pub(crate) fn new(schema: Arc<Schema>, id: ModelId) -> Model {
        let slots = schema
            .model(id)
            .relations
            .keys()
            .map(|name| (name.clone(), Slot::Unresolved))
            .collect();

        Model {
            schema,
            id,
            values: IndexMap::new(),
            is_new: true,
            slots,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The schema definition of the model.
    pub fn model(&self) -> &schema::Model {
        self.schema.model(self.id)
    }

    pub fn name(&self) -> &str {
        self.model().name.as_str()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns `true` until the model is persisted.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The primary key, if one is assigned.
    pub fn pk(&self) -> Option<&Value> {
        self.values
            .get(&self.model().primary_key)
            .filter(|value| !value.is_null())
    }

    /// Reads a column or extra attribute. Missing attributes read as null.
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }

    /// Returns `true` if the column or attribute has been set or loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Writes a column or extra attribute.
    ///
    /// Column values are cast to the column type. Writing the link column of
    /// a belongs-to relation resets that relation's slot to unresolved. The
    /// primary key of a persisted model cannot change.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let model = self.model();

        if model.relations.contains_key(name) {
            return Err(Error::invalid_assignment(
                model.name.as_str(),
                name,
                "is a relation; assign it with `assign` or `Db::set_relation`",
            ));
        }

        let value = match model.column(name) {
            Some(column) => value.cast(column.ty)?,
            None => value,
        };

        if name == model.primary_key && !self.is_new && self.pk() != Some(&value) {
            return Err(Error::invalid_assignment(
                model.name.as_str(),
                name,
                "the primary key of a persisted model cannot change",
            ));
        }

        self.write_link(name, value);
        Ok(())
    }

    /// Column values and extra attributes, in load order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// The slot of the named relation.
    pub fn slot(&self, name: &str) -> Result<&Slot> {
        self.slots
            .get(name)
            .ok_or_else(|| Error::unknown_relation(self.name(), name))
    }

    /// The cached value of the named relation, if it has been loaded or
    /// assigned.
    pub fn related(&self, name: &str) -> Result<Option<&Related>> {
        Ok(self.slot(name)?.value())
    }

    /// Assigns a related value, marking the slot dirty.
    ///
    /// Fails if the relation is undeclared, if the shape does not match
    /// (one versus many), or if a model is not an instance of the target.
    pub fn assign(&mut self, name: &str, related: impl Into<Related>) -> Result<()> {
        let related = related.into();
        let schema = self.schema.clone();
        let relation = schema.model(self.id).relation(name)?;
        let target = schema.model(relation.target);

        let invalid = |msg: String| Error::invalid_assignment(self.name(), name, msg);

        let related = match related {
            Related::Null if relation.is_many() => Related::Many(Default::default()),
            Related::Null => Related::Null,
            Related::One(_) if relation.is_many() => {
                return Err(invalid("expected a collection, got a model".into()));
            }
            Related::Many(_) if !relation.is_many() => {
                return Err(invalid("expected a model, got a collection".into()));
            }
            related => related,
        };

        let mismatch = match &related {
            Related::Null => None,
            Related::One(model) => Some(model.as_ref()).filter(|model| model.id != target.id),
            Related::Many(collection) => collection.iter().find(|model| model.id != target.id),
        };

        if let Some(model) = mismatch {
            return Err(invalid(format!(
                "expected a `{}`, got a `{}`",
                target.name,
                model.name()
            )));
        }

        self.set_slot(name, Slot::Dirty(related));
        Ok(())
    }

    pub(crate) fn set_slot(&mut self, name: &str, slot: Slot) {
        if let Some(current) = self.slots.get_mut(name) {
            tracing::trace!(
                model = %self.schema.model(self.id).name,
                relation = name,
                from = current.state(),
                to = slot.state(),
                "slot transition"
            );
            *current = slot;
        }
    }

    /// Writes a value and resets every belongs-to slot linked through it.
    pub(crate) fn write_link(&mut self, column: &str, value: Value) {
        self.values.insert(column.to_string(), value);

        let schema = self.schema.clone();
        let stale: Vec<&str> = schema
            .model(self.id)
            .relations_of(RelationKind::BelongsTo)
            .filter(|relation| relation.link_column() == Some(column))
            .map(|relation| relation.name.as_str())
            .filter(|name| !matches!(self.slots.get(*name), Some(Slot::Unresolved) | None))
            .collect();

        for name in stale {
            self.set_slot(name, Slot::Unresolved);
        }
    }

    /// Loads a row read from storage, casting column values to their
    /// declared types.
    pub(crate) fn load_row(&mut self, row: Row) -> Result<()> {
        let schema = self.schema.clone();
        let model = schema.model(self.id);

        for (name, value) in row {
            let value = match model.column(&name) {
                Some(column) => value.cast(column.ty).map_err(|err| {
                    err.context(tether_core::err!("loading `{}.{}`", model.name, name))
                })?,
                None => value,
            };
            self.values.insert(name, value);
        }

        self.is_new = false;
        Ok(())
    }

    /// Marks every loaded or assigned slot persisted.
    pub(crate) fn mark_persisted(&mut self) {
        let names: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.is_unresolved() && !slot.is_persisted())
            .map(|(name, _)| name.clone())
            .collect();

        for name in names {
            if let Some(slot) = self.slots.get_mut(&name) {
                let persisted = std::mem::take(slot).into_persisted();
                *slot = persisted;
            }
            tracing::trace!(model = %self.name(), relation = %name, to = "persisted", "slot transition");
        }

        self.is_new = false;
    }

    /// Forgets the primary key after the row was deleted.
    pub(crate) fn mark_deleted(&mut self) {
        let pk = self.model().primary_key.clone();
        self.values.shift_remove(&pk);

        let names: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.is_unresolved())
            .map(|(name, _)| name.clone())
            .collect();

        for name in names {
            if let Some(slot) = self.slots.get_mut(&name) {
                if let Some(value) = std::mem::take(slot).into_value() {
                    *slot = Slot::Dirty(value);
                }
            }
            tracing::trace!(model = %self.name(), relation = %name, to = "dirty", "slot transition");
        }

        self.is_new = true;
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct(self.name())
            .field("values", &self.values)
            .field("is_new", &self.is_new)
            .field("slots", &self.slots)
            .finish()
    }
}
