use super::Db;
use crate::{Model, Related, Result, Slot};

use async_recursion::async_recursion;
use tether_core::{
    driver::Operation,
    schema::{self, RelationKind},
    stmt::{Expr, Insert, Params, Update, Value},
    Error,
};

impl Db {
    /// Persists an instance together with its loaded or assigned relations.
    ///
    /// Belongs-to targets are written first so the owner row can store
    /// their keys. The owner row is then inserted or updated, and has-one,
    /// has-many and many-to-many relations are reconciled against what is
    /// stored. Unresolved relations are left untouched.
    ///
    /// The first failing statement aborts the save. Statements issued
    /// before it are not rolled back unless the caller wrapped the save in
    /// a transaction.
    #[async_recursion]
    pub async fn save(&self, model: &mut Model) -> Result<()> {
        let schema = model.schema().clone();
        let def = schema.model(model.id());
        let was_new = model.is_new();

        for relation in def.relations.values() {
            if relation.kind.is_pre_save() {
                self.save_belongs_to(model, relation).await?;
            }
        }

        if was_new {
            self.insert_row(model, def).await?;
        } else {
            self.update_row(model, def).await?;
        }

        for relation in def.relations.values() {
            if relation.kind.is_pre_save() || model.slot(&relation.name)?.is_unresolved() {
                continue;
            }

            match relation.kind {
                RelationKind::BelongsTo => {}
                RelationKind::HasOne => self.save_has_one(model, relation, was_new).await?,
                RelationKind::HasMany => self.save_has_many(model, relation, was_new).await?,
                RelationKind::ManyToMany => {
                    self.save_many_to_many(model, relation, was_new).await?
                }
            }
        }

        model.mark_persisted();
        Ok(())
    }

    async fn save_belongs_to(&self, model: &mut Model, relation: &schema::Relation) -> Result<()> {
        let Some(column) = relation.link_column() else {
            return Ok(());
        };

        let owner = model.name().to_string();
        let Some(related) = model.slots.get_mut(&relation.name).and_then(Slot::value_mut) else {
            return Ok(());
        };

        let link = match related {
            Related::Null => Value::Null,
            Related::One(target) => {
                if target.is_new() {
                    self.save(target).await?;
                }

                match target.pk() {
                    Some(pk) => pk.clone(),
                    None => {
                        return Err(Error::invalid_result(format!(
                            "`{}` has no primary key after being saved",
                            target.name()
                        )))
                    }
                }
            }
            Related::Many(_) => {
                return Err(Error::invalid_assignment(
                    owner,
                    relation.name.as_str(),
                    "expected a model, got a collection",
                ))
            }
        };

        model.values.insert(column.to_string(), link);
        Ok(())
    }

    async fn insert_row(&self, model: &mut Model, def: &schema::Model) -> Result<()> {
        let pk_column = def.primary_key_column();
        let mut stmt = Insert::new(def.table_name.as_str());

        for column in def.columns.values() {
            let Some(value) = model.values.get(&column.name) else {
                continue;
            };

            if column.auto_increment && value.is_null() {
                continue;
            }

            stmt = stmt.value(column.name.as_str(), value.clone());
        }

        if !pk_column.auto_increment {
            self.exec(Operation::for_statement(stmt, Params::new()))
                .await?;
            model.is_new = false;
            return Ok(());
        }

        let rows = self
            .exec(Operation::for_statement(
                stmt.returning(pk_column.name.as_str()),
                Params::new(),
            ))
            .await?
            .into_values()?;

        let pk = rows
            .first()
            .and_then(|row| row.get(&pk_column.name))
            .filter(|pk| !pk.is_null())
            .cloned()
            .ok_or_else(|| {
                Error::invalid_result(format!(
                    "insert into `{}` did not return `{}`",
                    def.table_name, pk_column.name
                ))
            })?;

        model
            .values
            .insert(pk_column.name.clone(), pk.cast(pk_column.ty)?);
        model.is_new = false;
        Ok(())
    }

    async fn update_row(&self, model: &mut Model, def: &schema::Model) -> Result<()> {
        let Some(pk) = model.pk().cloned() else {
            return Err(Error::record_not_found(format!(
                "`{}` has no primary key",
                def.name
            )));
        };

        let mut stmt = Update::new(def.table_name.as_str());

        for column in def.columns.values() {
            if column.name == def.primary_key {
                continue;
            }

            if let Some(value) = model.values.get(&column.name) {
                stmt = stmt.set(column.name.as_str(), value.clone());
            }
        }

        if stmt.assignments.is_empty() {
            return Ok(());
        }

        let stmt = stmt.filter(Expr::eq(
            Expr::column(&def.primary_key),
            Expr::placeholder("__pk"),
        ));

        let count = self
            .exec(Operation::for_statement(
                stmt,
                Params::new().with("__pk", pk.clone()),
            ))
            .await?
            .into_count()?;

        if count == 0 {
            return Err(Error::record_not_found(format!(
                "`{}` with primary key {pk:?}",
                def.name
            )));
        }

        Ok(())
    }
}
