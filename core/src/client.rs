//! Synchronous client for the WeCom server API.
//!
//! # Design
//! `Client` holds the base URL, a token supplier and a transport, none of
//! which change after construction. Every call goes through the same steps:
//! a `build_*` method produces an `HttpRequest`, the transport executes it,
//! and `parse_json` checks the status, decodes the body into the caller's
//! target and finally asks the target for an embedded `errcode`. The
//! `*_with_token` variants fetch a token first and bind it to the route's
//! first placeholder.

use serde::Serialize;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{reason_phrase, HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::media::{self, Media};
use crate::response::ApiResponse;
use crate::route::TokenRoute;
use crate::token::TokenSupplier;

/// Blocking WeCom API client.
///
/// Targets passed to the executing methods are overwritten only once the
/// body has been decoded. When the body carries a non-zero `errcode` the
/// decoded target is kept and `ApiError::Domain` is returned.
#[derive(Debug, Clone)]
pub struct Client<S, T = UreqTransport> {
    base_url: String,
    tokens: S,
    transport: T,
}

impl<S: TokenSupplier> Client<S> {
    /// Client for the production endpoint using a default ureq agent.
    pub fn new(tokens: S) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tokens,
            transport: UreqTransport::new(),
        }
    }

    pub fn from_config(config: &ClientConfig, tokens: S) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            transport: UreqTransport::with_timeout(config.timeout()),
        }
    }
}

impl<S, T> Client<S, T> {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_transport<U: Transport>(self, transport: U) -> Client<S, U> {
        Client {
            base_url: self.base_url,
            tokens: self.tokens,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get(&self, route: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(route),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post_json<P: Serialize + ?Sized>(
        &self,
        route: &str,
        payload: &P,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_vec(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(route),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_post_media<R: std::io::Read>(
        &self,
        route: &str,
        media: &mut Media<R>,
    ) -> Result<HttpRequest, ApiError> {
        let form = media::encode(media)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(route),
            headers: vec![("content-type".to_string(), form.content_type)],
            body: Some(form.bytes),
        })
    }

    /// Check the status, decode the body into `target`, then surface any
    /// embedded `errcode` as `ApiError::Domain`.
    pub fn parse_json<R: ApiResponse>(
        &self,
        response: HttpResponse,
        target: &mut R,
    ) -> Result<(), ApiError> {
        check_status(&response)?;
        *target = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        match target.embedded_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }
}

impl<S, T: Transport> Client<S, T> {
    /// GET `base_url + route` and decode the body into `target`.
    pub fn fetch_json<R: ApiResponse>(&self, route: &str, target: &mut R) -> Result<(), ApiError> {
        let response = self.transport.execute(self.build_get(route))?;
        self.parse_json(response, target)
    }

    /// POST `payload` as JSON to `base_url + route` and decode the body into
    /// `target`.
    pub fn post_json<P, R>(&self, route: &str, payload: &P, target: &mut R) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
        R: ApiResponse,
    {
        let request = self.build_post_json(route, payload)?;
        let response = self.transport.execute(request)?;
        self.parse_json(response, target)
    }

    /// Upload `media` as the `media` field of a multipart form.
    pub fn post_media<M, R>(
        &self,
        route: &str,
        media: &mut Media<M>,
        target: &mut R,
    ) -> Result<(), ApiError>
    where
        M: std::io::Read,
        R: ApiResponse,
    {
        let request = self.build_post_media(route, media)?;
        let response = self.transport.execute(request)?;
        self.parse_json(response, target)
    }
}

impl<S: TokenSupplier, T: Transport> Client<S, T> {
    pub fn fetch_json_with_token<R: ApiResponse>(
        &self,
        route: &TokenRoute,
        target: &mut R,
    ) -> Result<(), ApiError> {
        let path = self.token_path(route)?;
        self.fetch_json(&path, target)
    }

    pub fn post_json_with_token<P, R>(
        &self,
        route: &TokenRoute,
        payload: &P,
        target: &mut R,
    ) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
        R: ApiResponse,
    {
        let path = self.token_path(route)?;
        self.post_json(&path, payload, target)
    }

    pub fn post_media_with_token<M, R>(
        &self,
        route: &TokenRoute,
        media: &mut Media<M>,
        target: &mut R,
    ) -> Result<(), ApiError>
    where
        M: std::io::Read,
        R: ApiResponse,
    {
        let path = self.token_path(route)?;
        self.post_media(&path, media, target)
    }

    fn token_path(&self, route: &TokenRoute) -> Result<String, ApiError> {
        let token = self.tokens.access_token().map_err(ApiError::Token)?;
        Ok(route.path(&token))
    }
}

/// Anything but 200 is a failure, including other 2xx codes.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        code: response.status,
        status: reason_phrase(response.status),
    })
}
