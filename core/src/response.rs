//! The embedded-error contract every response target implements.
//!
//! WeCom answers most failures with HTTP 200 and a body such as
//! `{"errcode": 40014, "errmsg": "invalid access_token"}`. After a body is
//! decoded, the client asks the target for its embedded error and returns it
//! as `ApiError::Domain`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A decodable response that can report a platform-level failure.
pub trait ApiResponse: DeserializeOwned {
    fn embedded_error(&self) -> Option<DomainError>;
}

/// The `errcode` / `errmsg` pair shared by every WeCom response.
///
/// Concrete response types embed it with `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonResponse {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl CommonResponse {
    pub fn is_ok(&self) -> bool {
        self.errcode == 0
    }
}

impl ApiResponse for CommonResponse {
    fn embedded_error(&self) -> Option<DomainError> {
        if self.is_ok() {
            return None;
        }
        Some(DomainError {
            code: self.errcode,
            message: self.errmsg.clone(),
        })
    }
}

/// Untyped bodies report `errcode` / `errmsg` keys when present. Any
/// non-zero numeric `errcode` counts, including floats and numeric strings.
impl ApiResponse for serde_json::Value {
    fn embedded_error(&self) -> Option<DomainError> {
        let code = errcode_of(self.get("errcode")?)?;
        if code == 0 {
            return None;
        }
        let message = self
            .get("errmsg")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(DomainError { code, message })
    }
}

fn errcode_of(value: &serde_json::Value) -> Option<i64> {
    use serde_json::Value;

    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(float_code)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(float_code),
        _ => None,
    }
}

// Fractions must not truncate to a success code.
fn float_code(f: f64) -> i64 {
    match f as i64 {
        0 if f != 0.0 => 1,
        code => code,
    }
}
