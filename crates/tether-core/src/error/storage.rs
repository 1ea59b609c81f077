use super::Error;

/// Error when the storage layer fails to run a statement.
///
/// This wraps errors from the underlying database library: connectivity
/// problems, constraint violations, malformed SQL. The error is passed
/// through unchanged and never retried.
#[derive(Debug)]
pub(super) struct StorageError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // Display the error and walk its source chain
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a storage failure.
    ///
    /// This is the preferred way for drivers to convert their library's
    /// errors (rusqlite, ...) into tether errors.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Storage(StorageError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a storage
    /// error.
    pub fn is_storage(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Storage(_)))
    }
}
