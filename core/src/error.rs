//! Error types for the WeCom API client.
//!
//! # Design
//! Transport-level failures and platform-level failures are kept apart. A
//! non-200 status lands in `HttpStatus`; an HTTP 200 whose JSON body carries a
//! non-zero `errcode` lands in `Domain`. Token supplier failures are wrapped
//! transparently so callers can downcast to the supplier's own error type.

/// Boxed error returned by token suppliers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `Client` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response, or the multipart body could
    /// not be written.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("wxbizhttp:{code}({status})")]
    HttpStatus { code: u16, status: String },

    /// The response body could not be decoded into the target type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Copying the media bytes into the upload body failed.
    #[error("media stream failed: {0}")]
    Stream(#[source] std::io::Error),

    /// The platform reported a failure inside an HTTP 200 body.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The token supplier failed.
    #[error(transparent)]
    Token(BoxError),

    /// A route template is malformed or does not match its values.
    #[error("invalid route: {0}")]
    InvalidRoute(String),
}

/// Application-level error embedded in a JSON body as `errcode` / `errmsg`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wxbiz:{code}({message})")]
pub struct DomainError {
    pub code: i64,
    pub message: String,
}
