//! Synchronous client core for the WeCom (Work WeChat) server API.
//!
//! # Overview
//! Builds request URLs, binds access tokens into route templates, encodes
//! JSON and multipart media bodies, and interprets responses: HTTP status
//! first, then JSON decoding, then the `errcode` the platform embeds in
//! otherwise successful bodies.
//!
//! # Design
//! - `Client` is immutable after construction and holds a base URL, a
//!   `TokenSupplier` and a `Transport`.
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`);
//!   `build_*` and `parse_json` are pure, and the executing methods compose
//!   them with the transport. The default transport is blocking ureq.
//! - Routes are typed: `Route` and `TokenRoute` check the placeholder count
//!   when they are constructed.
//! - Each call either fills the caller's target or returns one `ApiError`.
//!   Nothing is retried and no token is cached here.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod response;
pub mod route;
pub mod token;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, BoxError, DomainError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use media::{Media, MultipartBody};
pub use response::{ApiResponse, CommonResponse};
pub use route::{Route, RouteTemplate, TokenRoute};
pub use token::TokenSupplier;
pub use types::{AccessTokenResponse, MediaUploadResponse, GET_TOKEN_ROUTE, MEDIA_UPLOAD_ROUTE};
