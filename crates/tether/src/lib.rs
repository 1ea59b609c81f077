pub mod collection;
pub use collection::Collection;

pub mod db;
pub use db::Db;

pub mod driver;

mod model;
pub use model::Model;

pub mod registry;
pub use registry::{Factory, Registry};

pub mod relation;
pub use relation::{Assignment, QueryOptions, Related, RelationAware, Slot};

pub use tether_core::{err, schema, stmt, Error, Result, Schema};
