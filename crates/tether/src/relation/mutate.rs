use super::{QueryOptions, Related, Slot};
use crate::{Collection, Db, Model, Result};

use tether_core::{
    driver::Operation,
    err,
    schema::{Junction, Relation},
    stmt::{Delete, Expr, Insert, Params, Update, Value},
};

impl Db {
    /// Points the desired target at the owner and unlinks the previous one
    /// when it differs.
    pub(crate) async fn save_has_one(
        &self,
        model: &mut Model,
        relation: &Relation,
        was_new: bool,
    ) -> Result<()> {
        let (column, owner) = link_of(model, relation)?;

        let previous = if was_new {
            None
        } else {
            self.resolve(model, relation, &QueryOptions::default())
                .await?
                .into_one()
        };

        let Some(desired) = model.slots.get_mut(&relation.name).and_then(Slot::value_mut) else {
            return Ok(());
        };

        let desired = match desired {
            Related::One(target) => Some(target.as_mut()),
            _ => None,
        };

        if let Some(mut previous) = previous {
            let replaced = match &desired {
                Some(target) => target.pk() != previous.pk(),
                None => true,
            };

            if replaced {
                previous.write_link(&column, Value::Null);
                self.save(&mut previous).await?;
            }
        }

        if let Some(target) = desired {
            target.write_link(&column, owner);
            self.save(target).await?;
        }

        Ok(())
    }

    /// Unlinks previous targets missing from the desired collection, then
    /// links and saves every desired target.
    pub(crate) async fn save_has_many(
        &self,
        model: &mut Model,
        relation: &Relation,
        was_new: bool,
    ) -> Result<()> {
        let (column, owner) = link_of(model, relation)?;

        let previous = self.previous(model, relation, was_new).await?;

        let Some(Related::Many(desired)) =
            model.slots.get_mut(&relation.name).and_then(Slot::value_mut)
        else {
            return Ok(());
        };

        for mut removed in previous.difference_by_pk(desired) {
            removed.write_link(&column, Value::Null);
            self.save(&mut removed).await?;
        }

        for target in desired.iter_mut() {
            target.write_link(&column, owner.clone());
            self.save(target).await?;
        }

        Ok(())
    }

    /// Reconciles junction rows with the desired collection.
    ///
    /// Rows of removed targets are deleted first, then rows for added
    /// targets are inserted (saving new targets beforehand), then pivot
    /// values of the remaining rows are updated.
    pub(crate) async fn save_many_to_many(
        &self,
        model: &mut Model,
        relation: &Relation,
        was_new: bool,
    ) -> Result<()> {
        let Some(junction) = relation.junction() else {
            return Err(err!("relation `{}` has no junction table", relation.name));
        };

        let Some(this) = model.pk().cloned() else {
            return Err(err!("`{}` has no primary key", model.name()));
        };

        let previous = self.previous(model, relation, was_new).await?;
        let owner = model.name().to_string();

        let Some(Related::Many(desired)) =
            model.slots.get_mut(&relation.name).and_then(Slot::value_mut)
        else {
            return Ok(());
        };

        let mut deleted = 0;
        for removed in &previous.difference_by_pk(desired) {
            let Some(that) = removed.pk() else {
                continue;
            };

            let stmt = Delete::new(junction.table.as_str()).filter(junction_key(junction));
            self.exec(Operation::for_statement(stmt, keyed(&this, that)))
                .await?;
            deleted += 1;
        }

        for target in desired.iter_mut() {
            if target.is_new() {
                self.save(target).await?;
            }
        }

        // A target repeated in the desired set is linked once
        let linked: Collection = desired
            .clone()
            .group(|target| target.pk().cloned())
            .into_iter()
            .filter_map(|(pk, group)| pk.and(group.into_iter().next()))
            .collect();

        let (existing, added) = linked.partition(|target| {
            target
                .pk()
                .is_some_and(|that| previous.contains_pk(that))
        });

        let mut inserted = 0;
        for target in &added {
            let Some(that) = target.pk() else {
                continue;
            };

            let mut stmt = Insert::new(junction.table.as_str())
                .value(junction.this.as_str(), this.clone())
                .value(junction.that.as_str(), that.clone());

            for (pivot, value) in pivot_values(target, junction)? {
                stmt = stmt.value(pivot, value);
            }

            self.exec(Operation::for_statement(stmt, Params::new()))
                .await?;
            inserted += 1;
        }

        let mut updated = 0;
        if junction.has_pivots() {
            for target in &existing {
                let Some(that) = target.pk() else {
                    continue;
                };

                let mut stmt = Update::new(junction.table.as_str());
                for (pivot, value) in pivot_values(target, junction)? {
                    stmt = stmt.set(pivot, value);
                }

                if stmt.assignments.is_empty() {
                    continue;
                }

                let stmt = stmt.filter(junction_key(junction));
                self.exec(Operation::for_statement(stmt, keyed(&this, that)))
                    .await?;
                updated += 1;
            }
        }

        tracing::debug!(
            model = %owner,
            relation = %relation.name,
            junction = %junction.table,
            deleted,
            inserted,
            updated,
            "many-to-many reconciled"
        );

        Ok(())
    }

    /// The stored value of a many relation. Nothing is stored yet for an
    /// owner that was new before this save.
    async fn previous(&self, model: &Model, relation: &Relation, was_new: bool) -> Result<Collection> {
        if was_new {
            return Ok(Collection::fetched(vec![]));
        }

        Ok(self
            .resolve(model, relation, &QueryOptions::default())
            .await?
            .into_many()
            .unwrap_or_default())
    }
}

/// The link column of a has-one or has-many relation and the owner key it
/// must hold.
fn link_of(model: &Model, relation: &Relation) -> Result<(String, Value)> {
    let Some(column) = relation.link_column() else {
        return Err(err!("relation `{}` has no link column", relation.name));
    };

    let Some(owner) = model.pk() else {
        return Err(err!("`{}` has no primary key", model.name()));
    };

    Ok((column.to_string(), owner.clone()))
}

/// Pivot values present on `target`, cast to their junction column types.
fn pivot_values(target: &Model, junction: &Junction) -> Result<Vec<(String, Value)>> {
    let mut values = vec![];

    for (name, column) in &junction.pivots {
        if !target.contains(name) {
            continue;
        }

        let value = target.get(name).clone().cast(column.ty).map_err(|err| {
            err.context(err!("pivot `{}.{}`", junction.table, name))
        })?;
        values.push((name.clone(), value));
    }

    Ok(values)
}

fn junction_key(junction: &Junction) -> Expr {
    Expr::and(
        Expr::eq(Expr::column(&junction.this), Expr::placeholder("__this")),
        Expr::eq(Expr::column(&junction.that), Expr::placeholder("__that")),
    )
}

fn keyed(this: &Value, that: &Value) -> Params {
    Params::new()
        .with("__this", this.clone())
        .with("__that", that.clone())
}
