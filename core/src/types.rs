//! Response DTOs for the WeCom routes the client knows about.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::response::{ApiResponse, CommonResponse};

/// Route for exchanging corp credentials for an access token.
pub const GET_TOKEN_ROUTE: &str = "/gettoken?corpid=%s&corpsecret=%s";

/// Route for uploading temporary media; the second value is the media type.
pub const MEDIA_UPLOAD_ROUTE: &str = "/media/upload?access_token=%s&type=%s";

/// Body of `GET /gettoken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(flatten)]
    pub common: CommonResponse,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

impl ApiResponse for AccessTokenResponse {
    fn embedded_error(&self) -> Option<DomainError> {
        self.common.embedded_error()
    }
}

/// Body of `POST /media/upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    #[serde(flatten)]
    pub common: CommonResponse,
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub media_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl ApiResponse for MediaUploadResponse {
    fn embedded_error(&self) -> Option<DomainError> {
        self.common.embedded_error()
    }
}
