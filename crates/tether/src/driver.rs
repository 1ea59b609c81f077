use crate::Result;

pub use tether_core::driver::{
    operation::{self, Operation},
    Driver, Response, Rows,
};

use tether_core::err;
use url::Url;

/// Opens the driver selected by the URL scheme.
pub fn connect(url: &str) -> Result<Box<dyn Driver>> {
    let parsed = Url::parse(url).map_err(|e| err!("invalid connection url `{url}`: {e}"))?;

    match parsed.scheme() {
        "sqlite" => connect_sqlite(url),
        scheme => Err(err!("unsupported database; scheme={scheme}; url={url}")),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(tether_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(err!("`sqlite` feature not enabled"))
}
