use super::{Link, Model, RelationKind, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for model in self.schema.models() {
            self.verify_primary_key(model)?;
            self.verify_link_columns(model)?;
        }

        self.verify_table_names_are_unique()?;
        Ok(())
    }

    fn verify_primary_key(&self, model: &Model) -> Result<()> {
        match model.column(&model.primary_key) {
            Some(column) if !column.nullable => Ok(()),
            Some(_) => Err(Error::invalid_schema(format!(
                "primary key `{}.{}` must not be nullable",
                model.name, model.primary_key
            ))),
            None => Err(Error::invalid_schema(format!(
                "model `{}` has no primary key column `{}`",
                model.name, model.primary_key
            ))),
        }
    }

    fn verify_link_columns(&self, model: &Model) -> Result<()> {
        for relation in model.relations.values() {
            match &relation.link {
                Link::Column(column) => {
                    let carrier = match relation.kind {
                        RelationKind::BelongsTo => model,
                        _ => self.schema.model(relation.target),
                    };

                    if column == &carrier.primary_key {
                        return Err(Error::invalid_schema(format!(
                            "relation `{}.{}` uses the primary key of `{}` as its link column",
                            model.name, relation.name, carrier.name
                        )));
                    }

                    if carrier.column(column).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "link column `{}.{}` of relation `{}.{}` does not exist",
                            carrier.name, column, model.name, relation.name
                        )));
                    }
                }
                Link::Junction(junction) => {
                    if self.schema.table(&junction.table).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "junction table `{}` of relation `{}.{}` does not exist",
                            junction.table, model.name, relation.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn verify_table_names_are_unique(&self) -> Result<()> {
        let tables = self.schema.tables();

        for (index, table) in tables.iter().enumerate() {
            if tables[..index].iter().any(|other| other.name == table.name) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is used by more than one model",
                    table.name
                )));
            }
        }

        Ok(())
    }
}
