//! In-process imitation of the WeCom server API.
//!
//! Serves the handful of `/cgi-bin` routes the client tests need, with the
//! platform's habit of reporting failures as HTTP 200 plus a non-zero
//! `errcode`. Credentials are fixed: `CORP_ID` / `CORP_SECRET` exchange for
//! `ACCESS_TOKEN`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CORP_ID: &str = "ww-test-corp";
pub const CORP_SECRET: &str = "test-secret";
pub const ACCESS_TOKEN: &str = "test-access-token";

pub const ERR_INVALID_CREDENTIAL: i64 = 40001;
pub const ERR_INVALID_TOKEN: i64 = 40014;
pub const ERR_EMPTY_MEDIA: i64 = 44001;
pub const ERR_USERID_EXISTS: i64 = 60102;
pub const ERR_USER_NOT_FOUND: i64 = 60111;
pub const ERR_INVALID_RECEIVER: i64 = 81013;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub userid: String,
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, User>>>;

#[derive(Deserialize)]
pub struct TokenQuery {
    pub corpid: String,
    pub corpsecret: String,
}

#[derive(Deserialize)]
pub struct AuthQuery {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub access_token: String,
    pub userid: String,
}

#[derive(Deserialize)]
pub struct MediaQuery {
    pub access_token: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/gettoken", get(get_token))
        .route("/user/create", post(create_user))
        .route("/user/get", get(get_user))
        .route("/message/send", post(send_message))
        .route("/media/upload", post(upload_media))
        .route("/status/{code}", get(fixed_status))
        .route("/garbled", get(garbled))
        .with_state(db);
    Router::new().nest("/cgi-bin", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(mut body: Value) -> Json<Value> {
    if let Some(map) = body.as_object_mut() {
        map.insert("errcode".to_string(), json!(0));
        map.insert("errmsg".to_string(), json!("ok"));
    }
    Json(body)
}

fn fail(code: i64, message: &str) -> Json<Value> {
    Json(json!({ "errcode": code, "errmsg": message }))
}

fn authorize(token: &str) -> Result<(), Json<Value>> {
    if token == ACCESS_TOKEN {
        Ok(())
    } else {
        Err(fail(ERR_INVALID_TOKEN, "invalid access_token"))
    }
}

async fn get_token(Query(q): Query<TokenQuery>) -> Json<Value> {
    if q.corpid != CORP_ID || q.corpsecret != CORP_SECRET {
        return fail(ERR_INVALID_CREDENTIAL, "invalid credential");
    }
    ok(json!({ "access_token": ACCESS_TOKEN, "expires_in": 7200 }))
}

async fn create_user(
    State(db): State<Db>,
    Query(q): Query<AuthQuery>,
    Json(user): Json<User>,
) -> Json<Value> {
    if let Err(e) = authorize(&q.access_token) {
        return e;
    }
    let mut users = db.write().await;
    if users.contains_key(&user.userid) {
        return fail(ERR_USERID_EXISTS, "userid existed");
    }
    users.insert(user.userid.clone(), user);
    ok(json!({ "created": true }))
}

async fn get_user(State(db): State<Db>, Query(q): Query<UserQuery>) -> Json<Value> {
    if let Err(e) = authorize(&q.access_token) {
        return e;
    }
    let users = db.read().await;
    match users.get(&q.userid) {
        Some(user) => ok(json!(user)),
        None => fail(ERR_USER_NOT_FOUND, "userid not found"),
    }
}

async fn send_message(
    State(db): State<Db>,
    Query(q): Query<AuthQuery>,
    Json(message): Json<Value>,
) -> Json<Value> {
    if let Err(e) = authorize(&q.access_token) {
        return e;
    }
    let users = db.read().await;
    let touser = message["touser"].as_str().unwrap_or_default();
    let invalid: Vec<&str> = touser
        .split('|')
        .filter(|id| !users.contains_key(*id))
        .collect();
    if touser.is_empty() || invalid.len() == touser.split('|').count() {
        return fail(ERR_INVALID_RECEIVER, "all receivers are invalid");
    }
    ok(json!({
        "invaliduser": invalid.join("|"),
        "msgid": Uuid::new_v4().simple().to_string(),
    }))
}

/// Accepts exactly one `media` file part. The returned `media_id` is
/// `<byte count>:<filename>` so callers can check what arrived.
async fn upload_media(
    Query(q): Query<MediaQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    if let Err(e) = authorize(&q.access_token) {
        return Ok(e);
    }

    let mut uploaded = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() != Some("media") || uploaded.is_some() {
            return Err(StatusCode::BAD_REQUEST);
        }
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or(StatusCode::BAD_REQUEST)?;
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        uploaded = Some((filename, bytes.len()));
    }

    let (filename, len) = uploaded.ok_or(StatusCode::BAD_REQUEST)?;
    if len == 0 {
        return Ok(fail(ERR_EMPTY_MEDIA, "empty media data"));
    }
    Ok(ok(json!({
        "type": q.media_type,
        "media_id": format!("{len}:{filename}"),
        "created_at": "1380000000",
    })))
}

async fn fixed_status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "errcode": 0, "errmsg": "ok" })))
}

async fn garbled() -> &'static str {
    "<html>upstream gateway</html>"
}
