mod exec_log;
pub use exec_log::ExecLog;

pub mod fixtures;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

use tether::{schema, Db};

/// Builds a `Db` over a fresh in-memory SQLite database, with every
/// operation recorded in the returned log.
pub async fn setup(models: schema::Builder) -> (Db, ExecLog) {
    init_tracing();

    let driver = LoggingDriver::new(tether::driver::connect("sqlite::memory:").unwrap());
    let log = ExecLog::from(&driver);

    let db = Db::builder().register(models).build(driver).await.unwrap();
    (db, log)
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
