use super::{QueryOptions, Related, RelationAware, Slot};
use crate::{Collection, Db, Model, Result};

use tether_core::{
    err,
    schema::{Junction, Relation, RelationKind},
    stmt::{Expr, Join, Projection, Select, TableRef},
};

impl Db {
    /// Fetches the current value of a relation from storage.
    ///
    /// Always queries; the slot of `model` is left untouched. A belongs-to
    /// whose target row is missing resolves to `Related::Null`. Relations of
    /// an unsaved model resolve to nothing without querying.
    pub async fn get_relation_lazy(
        &self,
        model: &Model,
        name: &str,
        options: &QueryOptions,
    ) -> Result<Related> {
        let relation = model.relation(name)?;
        self.resolve(model, relation, options).await
    }

    /// Returns the value of a relation, loading and caching it on first use.
    pub async fn load_relation<'a>(&self, model: &'a mut Model, name: &str) -> Result<&'a Related> {
        if model.slot(name)?.is_unresolved() {
            let schema = model.schema().clone();
            let relation = schema.model(model.id()).relation(name)?;

            let related = self
                .resolve(model, relation, &QueryOptions::default())
                .await?;
            model.set_slot(name, Slot::Resolved(related));
        }

        model
            .slot(name)?
            .value()
            .ok_or_else(|| err!("relation `{}.{name}` is not loaded", model.name()))
    }

    pub(crate) async fn resolve(
        &self,
        model: &Model,
        relation: &Relation,
        options: &QueryOptions,
    ) -> Result<Related> {
        match relation.kind {
            RelationKind::BelongsTo => self.resolve_belongs_to(model, relation, options).await,
            RelationKind::HasOne => Ok(self
                .resolve_has(model, relation, options, true)
                .await?
                .into_iter()
                .next()
                .into()),
            RelationKind::HasMany => Ok(self
                .resolve_has(model, relation, options, false)
                .await?
                .into()),
            RelationKind::ManyToMany => Ok(self
                .resolve_many_to_many(model, relation, options)
                .await?
                .into()),
        }
    }

    async fn resolve_belongs_to(
        &self,
        model: &Model,
        relation: &Relation,
        options: &QueryOptions,
    ) -> Result<Related> {
        let Some(column) = relation.link_column() else {
            return Ok(Related::Null);
        };

        let link = model.get(column);
        if link.is_null() {
            return Ok(Related::Null);
        }

        let target = self.schema().model(relation.target);

        let mut select = Select::new(target.table_name.as_str())
            .project(Projection::all())
            .filter(Expr::eq(
                Expr::column(&target.primary_key),
                Expr::placeholder("__pk"),
            ))
            .limit(1);

        if let Some(filter) = &options.filter {
            select.and_filter(filter.clone());
        }

        let mut params = options.params.clone();
        params.set("__pk", link.clone().cast(target.primary_key_column().ty)?);

        let found = self.fetch(target.id, select, params).await?;
        Ok(found.into_iter().next().into())
    }

    /// Target rows whose link column holds the key of `model`.
    async fn resolve_has(
        &self,
        model: &Model,
        relation: &Relation,
        options: &QueryOptions,
        single: bool,
    ) -> Result<Collection> {
        let (Some(column), Some(pk)) = (relation.link_column(), model.pk()) else {
            return Ok(Collection::fetched(vec![]));
        };

        let target = self.schema().model(relation.target);

        let mut select = Select::new(target.table_name.as_str())
            .project(Projection::all())
            .filter(Expr::eq(Expr::column(column), Expr::placeholder("__owner")));
        options.apply(&mut select, None);

        if single {
            select.limit = Some(1);
        }

        let mut params = options.params.clone();
        params.set("__owner", pk.clone());

        let found = self.fetch(target.id, select, params).await?;
        Ok(Collection::fetched(found))
    }

    /// Targets linked to `model` through the junction table, each carrying
    /// the pivot values of its junction row.
    async fn resolve_many_to_many(
        &self,
        model: &Model,
        relation: &Relation,
        options: &QueryOptions,
    ) -> Result<Collection> {
        let (Some(junction), Some(pk)) = (relation.junction(), model.pk()) else {
            return Ok(Collection::fetched(vec![]));
        };

        let target = self.schema().model(relation.target);

        let mut select = junction
            .pivots
            .keys()
            .fold(
                Select::new(TableRef::aliased(target.table_name.as_str(), "t1"))
                    .project(Projection::all_of("t1")),
                |select, pivot| select.project(Projection::column(Some("j1"), pivot)),
            )
            .join(Join::inner(
                TableRef::aliased(junction.table.as_str(), "j1"),
                Expr::eq(
                    Expr::qualified("t1", &target.primary_key),
                    Expr::qualified("j1", &junction.that),
                ),
            ))
            .filter(Expr::eq(
                Expr::qualified("j1", &junction.this),
                Expr::placeholder("__owner"),
            ));
        options.apply(&mut select, Some("t1"));

        let mut params = options.params.clone();
        params.set("__owner", pk.clone());

        let mut found = self.fetch(target.id, select, params).await?;
        for entity in &mut found {
            cast_pivots(entity, junction)?;
        }

        Ok(Collection::fetched(found))
    }
}

fn cast_pivots(entity: &mut Model, junction: &Junction) -> Result<()> {
    for (name, column) in &junction.pivots {
        if let Some(value) = entity.values.get_mut(name) {
            *value = std::mem::take(value).cast(column.ty)?;
        }
    }
    Ok(())
}
