use super::{
    junction_table_name, link_column_name, Column, Junction, Link, Model, ModelId, Name, Relation,
    RelationKind, Schema, Table,
};
use crate::{stmt::Type, Error, Result};

use indexmap::IndexMap;

/// Primary key column used when a model does not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "__id";

/// Declares models and their relations, then builds a verified [`Schema`].
///
/// ```
/// use tether_core::{schema::RelationDef, stmt::Type, Schema};
///
/// let schema = Schema::builder()
///     .model("Author", |m| {
///         m.column("name", Type::String).has_many("books", "Book");
///     })
///     .model("Book", |m| {
///         m.column("title", Type::String).belongs_to("author", "Author");
///     })
///     .model("Tag", |m| {
///         m.column("label", Type::String);
///     })
///     .model("Article", |m| {
///         m.relation(RelationDef::many_to_many("tags", "Tag").pivot("position", Type::I64));
///     })
///     .build()
///     .unwrap();
///
/// let book = schema.model_by_name("Book").unwrap();
/// assert!(book.column("__author_id").is_some());
/// assert!(schema.table("articles_to_tags").is_some());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Builder {
    models: Vec<ModelDef>,

    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,
}

/// Declaration of a single model.
#[derive(Debug, Clone)]
pub struct ModelDef {
    name: String,
    table: Option<String>,
    primary_key: Option<Column>,
    columns: Vec<Column>,
    relations: Vec<RelationDef>,
}

/// Declaration of a single relation.
#[derive(Debug, Clone)]
pub struct RelationDef {
    name: String,
    kind: RelationKind,
    target: String,

    /// Explicit link column, or junction table for many-to-many
    link: Option<String>,

    this: Option<String>,
    that: Option<String>,
    pivots: Vec<Column>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a model, configured by `f`.
    pub fn model(&mut self, name: &str, f: impl FnOnce(&mut ModelDef)) -> &mut Self {
        let mut def = ModelDef::new(name);
        f(&mut def);
        self.models.push(def);
        self
    }

    /// Adds an already configured model declaration.
    pub fn add(&mut self, def: ModelDef) -> &mut Self {
        self.models.push(def);
        self
    }

    /// Appends every model declared by `other`.
    pub fn merge(&mut self, other: Builder) -> &mut Self {
        self.models.extend(other.models);
        if self.table_name_prefix.is_none() {
            self.table_name_prefix = other.table_name_prefix;
        }
        self
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut build = BuildSchema {
            builder: self,
            models: IndexMap::new(),
            base_tables: vec![],
            junctions: IndexMap::new(),
        };

        build.declare_models()?;
        build.declare_relations()?;
        build.add_link_columns()?;
        build.merge_junctions()?;
        build.into_schema()
    }
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    models: IndexMap<ModelId, Model>,

    /// Table names before prefixing, indexed by model id. Junction names
    /// are derived from these.
    base_tables: Vec<String>,

    /// Junction tables by (prefixed) name
    junctions: IndexMap<String, Table>,
}

impl BuildSchema<'_> {
    fn declare_models(&mut self) -> Result<()> {
        for (index, def) in self.builder.models.iter().enumerate() {
            if self.lookup(&def.name).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` is declared more than once",
                    def.name
                )));
            }

            let id = ModelId(index);
            let name = Name::new(&def.name);
            let base_table = def.table.clone().unwrap_or_else(|| name.table_name());

            let primary_key = def.primary_key.clone().unwrap_or_else(|| {
                Column::new(DEFAULT_PRIMARY_KEY, Type::I64).auto_increment()
            });

            let mut columns = IndexMap::new();
            columns.insert(primary_key.name.clone(), primary_key.clone());

            for column in &def.columns {
                if columns.contains_key(&column.name) {
                    return Err(Error::invalid_schema(format!(
                        "column `{}.{}` is declared more than once",
                        def.name, column.name
                    )));
                }
                columns.insert(column.name.clone(), column.clone());
            }

            self.models.insert(
                id,
                Model {
                    id,
                    name,
                    table_name: self.prefixed(&base_table),
                    primary_key: primary_key.name,
                    columns,
                    relations: IndexMap::new(),
                },
            );
            self.base_tables.push(base_table);
        }

        Ok(())
    }

    fn declare_relations(&mut self) -> Result<()> {
        for (index, def) in self.builder.models.iter().enumerate() {
            let owner = ModelId(index);

            for relation in &def.relations {
                let owner_model = &self.models[&owner];

                if owner_model.relations.contains_key(&relation.name) {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` is declared more than once",
                        def.name, relation.name
                    )));
                }

                if owner_model.columns.contains_key(&relation.name) {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` has the same name as a column",
                        def.name, relation.name
                    )));
                }

                let target = self.lookup(&relation.target).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "relation `{}.{}` targets unknown model `{}`",
                        def.name, relation.name, relation.target
                    ))
                })?;

                let has_junction_options = relation.this.is_some()
                    || relation.that.is_some()
                    || !relation.pivots.is_empty();

                if relation.kind != RelationKind::ManyToMany && has_junction_options {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` is {}; `this`, `that` and pivots require many_to_many",
                        def.name,
                        relation.name,
                        relation.kind.as_str()
                    )));
                }

                let link = self.derive_link(owner, target, relation)?;

                let relation = Relation {
                    name: relation.name.clone(),
                    kind: relation.kind,
                    owner,
                    target,
                    link,
                };

                if let Some(model) = self.models.get_mut(&owner) {
                    model.relations.insert(relation.name.clone(), relation);
                }
            }
        }

        Ok(())
    }

    fn derive_link(&self, owner: ModelId, target: ModelId, def: &RelationDef) -> Result<Link> {
        let owner_model = &self.models[&owner];
        let target_model = &self.models[&target];

        Ok(match def.kind {
            RelationKind::BelongsTo => Link::Column(
                def.link
                    .clone()
                    .unwrap_or_else(|| link_column_name(&target_model.name)),
            ),
            RelationKind::HasOne | RelationKind::HasMany => Link::Column(
                def.link
                    .clone()
                    .unwrap_or_else(|| link_column_name(&owner_model.name)),
            ),
            RelationKind::ManyToMany => {
                let table = def.link.clone().unwrap_or_else(|| {
                    junction_table_name(&self.base_tables[owner.0], &self.base_tables[target.0])
                });
                let this = def
                    .this
                    .clone()
                    .unwrap_or_else(|| link_column_name(&owner_model.name));
                let that = def
                    .that
                    .clone()
                    .unwrap_or_else(|| link_column_name(&target_model.name));

                if this == that {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` uses `{this}` for both junction columns; declare distinct `this` and `that`",
                        owner_model.name, def.name
                    )));
                }

                let mut pivots = IndexMap::new();
                for pivot in &def.pivots {
                    if pivot.name == this || pivot.name == that || pivots.contains_key(&pivot.name)
                    {
                        return Err(Error::invalid_schema(format!(
                            "pivot `{}` of relation `{}.{}` is declared more than once",
                            pivot.name, owner_model.name, def.name
                        )));
                    }

                    // Pivot values are loaded into the attributes of both models
                    if owner_model.columns.contains_key(&pivot.name)
                        || target_model.columns.contains_key(&pivot.name)
                    {
                        return Err(Error::invalid_schema(format!(
                            "pivot `{}` of relation `{}.{}` has the same name as a model column",
                            pivot.name, owner_model.name, def.name
                        )));
                    }
                    pivots.insert(pivot.name.clone(), pivot.clone());
                }

                Link::Junction(Junction {
                    table: self.prefixed(&table),
                    this,
                    that,
                    pivots,
                })
            }
        })
    }

    /// Adds each derived link column to the model carrying it, unless the
    /// model already declares it.
    fn add_link_columns(&mut self) -> Result<()> {
        let mut additions = vec![];

        for model in self.models.values() {
            for relation in model.relations.values() {
                let (carrier, referenced) = match relation.kind {
                    RelationKind::BelongsTo => (relation.owner, relation.target),
                    RelationKind::HasOne | RelationKind::HasMany => {
                        (relation.target, relation.owner)
                    }
                    RelationKind::ManyToMany => continue,
                };
                let Some(column) = relation.link_column() else {
                    continue;
                };
                let ty = self.models[&referenced].primary_key_column().ty;
                additions.push((carrier, Column::new(column, ty).nullable()));
            }
        }

        for (carrier, column) in additions {
            let Some(model) = self.models.get_mut(&carrier) else {
                continue;
            };

            match model.columns.get(&column.name) {
                Some(existing) if existing.ty != column.ty => {
                    return Err(Error::invalid_schema(format!(
                        "link column `{}.{}` is {} but references a {} key",
                        model.name, column.name, existing.ty, column.ty
                    )));
                }
                Some(_) => {}
                None => {
                    model.columns.insert(column.name.clone(), column);
                }
            }
        }

        Ok(())
    }

    /// Collects one table per junction. Both sides of a many-to-many pair
    /// derive the same table; their declarations are merged and the merged
    /// pivot set is written back to every relation using the junction.
    fn merge_junctions(&mut self) -> Result<()> {
        for model in self.models.values() {
            for relation in model.relations.values() {
                let Some(junction) = relation.junction() else {
                    continue;
                };

                if self
                    .models
                    .values()
                    .any(|model| model.table_name == junction.table)
                {
                    return Err(Error::invalid_schema(format!(
                        "junction table `{}` of relation `{}.{}` collides with a model table",
                        junction.table, model.name, relation.name
                    )));
                }

                let this_ty = self.models[&relation.owner].primary_key_column().ty;
                let that_ty = self.models[&relation.target].primary_key_column().ty;

                let Some(table) = self.junctions.get_mut(&junction.table) else {
                    let mut columns = vec![
                        Column::new(&junction.this, this_ty),
                        Column::new(&junction.that, that_ty),
                    ];
                    columns.extend(junction.pivots.values().cloned());

                    self.junctions.insert(
                        junction.table.clone(),
                        Table {
                            name: junction.table.clone(),
                            columns,
                            primary_key: vec![junction.this.clone(), junction.that.clone()],
                        },
                    );
                    continue;
                };

                let same_links = table.primary_key.contains(&junction.this)
                    && table.primary_key.contains(&junction.that);

                if !same_links {
                    return Err(Error::invalid_schema(format!(
                        "junction table `{}` is linked by ({}) and by ({}, {})",
                        table.name,
                        table.primary_key.join(", "),
                        junction.this,
                        junction.that
                    )));
                }

                for pivot in junction.pivots.values() {
                    match table.column(&pivot.name) {
                        Some(existing) if existing != pivot => {
                            return Err(Error::invalid_schema(format!(
                                "pivot `{}` of junction table `{}` is declared with different types",
                                pivot.name, table.name
                            )));
                        }
                        Some(_) => {}
                        None => table.columns.push(pivot.clone()),
                    }
                }
            }
        }

        for model in self.models.values_mut() {
            for relation in model.relations.values_mut() {
                let Link::Junction(junction) = &mut relation.link else {
                    continue;
                };
                let Some(table) = self.junctions.get(&junction.table) else {
                    continue;
                };

                for column in &table.columns {
                    if column.name == junction.this || column.name == junction.that {
                        continue;
                    }
                    junction
                        .pivots
                        .entry(column.name.clone())
                        .or_insert_with(|| column.clone());
                }
            }
        }

        Ok(())
    }

    fn into_schema(self) -> Result<Schema> {
        let mut tables: Vec<Table> = self
            .models
            .values()
            .map(|model| Table {
                name: model.table_name.clone(),
                columns: model.columns.values().cloned().collect(),
                primary_key: vec![model.primary_key.clone()],
            })
            .collect();
        tables.extend(self.junctions.into_values());

        let schema = Schema {
            models: self.models,
            tables,
        };

        schema.verify()?;
        Ok(schema)
    }

    fn lookup(&self, name: &str) -> Option<ModelId> {
        self.models
            .values()
            .find(|model| model.name.as_str() == name)
            .map(|model| model.id)
    }

    fn prefixed(&self, table: &str) -> String {
        match &self.builder.table_name_prefix {
            Some(prefix) => format!("{prefix}{table}"),
            None => table.to_string(),
        }
    }
}

impl ModelDef {
    pub fn new(name: &str) -> ModelDef {
        ModelDef {
            name: name.to_string(),
            table: None,
            primary_key: None,
            columns: vec![],
            relations: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overrides the table name derived from the model name.
    pub fn table(&mut self, name: &str) -> &mut Self {
        self.table = Some(name.to_string());
        self
    }

    /// Overrides the default `__id` primary key. Integer keys are assigned
    /// by storage on insert; other keys must be set before the first save.
    pub fn primary_key(&mut self, name: &str, ty: Type) -> &mut Self {
        let column = Column::new(name, ty);
        self.primary_key = Some(match ty {
            Type::I64 => column.auto_increment(),
            _ => column,
        });
        self
    }

    pub fn column(&mut self, name: &str, ty: Type) -> &mut Self {
        self.columns.push(Column::new(name, ty));
        self
    }

    pub fn nullable(&mut self, name: &str, ty: Type) -> &mut Self {
        self.columns.push(Column::new(name, ty).nullable());
        self
    }

    pub fn column_def(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn belongs_to(&mut self, name: &str, target: &str) -> &mut Self {
        self.relation(RelationDef::belongs_to(name, target))
    }

    pub fn has_one(&mut self, name: &str, target: &str) -> &mut Self {
        self.relation(RelationDef::has_one(name, target))
    }

    pub fn has_many(&mut self, name: &str, target: &str) -> &mut Self {
        self.relation(RelationDef::has_many(name, target))
    }

    pub fn many_to_many(&mut self, name: &str, target: &str) -> &mut Self {
        self.relation(RelationDef::many_to_many(name, target))
    }

    pub fn relation(&mut self, relation: RelationDef) -> &mut Self {
        self.relations.push(relation);
        self
    }
}

impl RelationDef {
    fn new(name: &str, kind: RelationKind, target: &str) -> RelationDef {
        RelationDef {
            name: name.to_string(),
            kind,
            target: target.to_string(),
            link: None,
            this: None,
            that: None,
            pivots: vec![],
        }
    }

    pub fn belongs_to(name: &str, target: &str) -> RelationDef {
        RelationDef::new(name, RelationKind::BelongsTo, target)
    }

    pub fn has_one(name: &str, target: &str) -> RelationDef {
        RelationDef::new(name, RelationKind::HasOne, target)
    }

    pub fn has_many(name: &str, target: &str) -> RelationDef {
        RelationDef::new(name, RelationKind::HasMany, target)
    }

    pub fn many_to_many(name: &str, target: &str) -> RelationDef {
        RelationDef::new(name, RelationKind::ManyToMany, target)
    }

    /// Explicit link column, or junction table name for many-to-many.
    pub fn on(mut self, link: &str) -> RelationDef {
        self.link = Some(link.to_string());
        self
    }

    /// Same as [`RelationDef::on`].
    pub fn by(self, link: &str) -> RelationDef {
        self.on(link)
    }

    /// Junction column referencing the owner.
    pub fn this(mut self, column: &str) -> RelationDef {
        self.this = Some(column.to_string());
        self
    }

    /// Junction column referencing the target.
    pub fn that(mut self, column: &str) -> RelationDef {
        self.that = Some(column.to_string());
        self
    }

    /// Declares a pivot column stored on the junction row.
    pub fn pivot(mut self, name: &str, ty: Type) -> RelationDef {
        self.pivots.push(Column::new(name, ty).nullable());
        self
    }
}
