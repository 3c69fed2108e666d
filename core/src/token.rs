//! Access token supply.
//!
//! How tokens are fetched, cached and refreshed is up to the supplier. The
//! client calls it once per token-aware request and forwards its error as-is.

use crate::error::BoxError;

pub trait TokenSupplier {
    fn access_token(&self) -> Result<String, BoxError>;
}

impl<F, E> TokenSupplier for F
where
    F: Fn() -> Result<String, E>,
    E: Into<BoxError>,
{
    fn access_token(&self) -> Result<String, BoxError> {
        self().map_err(Into::into)
    }
}
