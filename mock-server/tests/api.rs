use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{
    app, ACCESS_TOKEN, CORP_ID, CORP_SECRET, ERR_EMPTY_MEDIA, ERR_INVALID_CREDENTIAL,
    ERR_INVALID_RECEIVER, ERR_INVALID_TOKEN, ERR_USERID_EXISTS, ERR_USER_NOT_FOUND,
};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn multipart_request(uri: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let boundary = "mockboundary";
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn with_token(path: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("/cgi-bin{path}{sep}access_token={ACCESS_TOKEN}")
}

// --- gettoken ---

#[tokio::test]
async fn gettoken_with_valid_credentials() {
    let uri = format!("/cgi-bin/gettoken?corpid={CORP_ID}&corpsecret={CORP_SECRET}");
    let resp = app().oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["errcode"], 0);
    assert_eq!(body["access_token"], ACCESS_TOKEN);
    assert_eq!(body["expires_in"], 7200);
}

#[tokio::test]
async fn gettoken_with_wrong_secret_is_200_with_errcode() {
    let uri = format!("/cgi-bin/gettoken?corpid={CORP_ID}&corpsecret=nope");
    let resp = app().oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["errcode"], ERR_INVALID_CREDENTIAL);
    assert!(body.get("access_token").is_none());
}

// --- user ---

#[tokio::test]
async fn create_then_get_user() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            &with_token("/user/create"),
            r#"{"userid":"zhangsan","name":"Zhang San"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["errcode"], 0);

    let resp = app
        .oneshot(get_request(&with_token("/user/get?userid=zhangsan")))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["errcode"], 0);
    assert_eq!(body["name"], "Zhang San");
}

#[tokio::test]
async fn create_duplicate_user_reports_errcode() {
    let app = app();
    let payload = r#"{"userid":"lisi","name":"Li Si"}"#;
    app.clone()
        .oneshot(json_request(&with_token("/user/create"), payload))
        .await
        .unwrap();
    let resp = app
        .oneshot(json_request(&with_token("/user/create"), payload))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["errcode"], ERR_USERID_EXISTS);
}

#[tokio::test]
async fn get_unknown_user_reports_errcode() {
    let resp = app()
        .oneshot(get_request(&with_token("/user/get?userid=ghost")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["errcode"], ERR_USER_NOT_FOUND);
}

#[tokio::test]
async fn stale_token_is_rejected() {
    let resp = app()
        .oneshot(get_request("/cgi-bin/user/get?access_token=stale&userid=zhangsan"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["errcode"], ERR_INVALID_TOKEN);
}

#[tokio::test]
async fn create_user_malformed_json_is_http_error() {
    let resp = app()
        .oneshot(json_request(&with_token("/user/create"), r#"{"name":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- message ---

#[tokio::test]
async fn send_message_to_unknown_user_reports_errcode() {
    let resp = app()
        .oneshot(json_request(
            &with_token("/message/send"),
            r#"{"touser":"nobody","msgtype":"text","text":{"content":"hi"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["errcode"], ERR_INVALID_RECEIVER);
}

#[tokio::test]
async fn send_message_lists_invalid_receivers() {
    let app = app();
    app.clone()
        .oneshot(json_request(
            &with_token("/user/create"),
            r#"{"userid":"wangwu","name":"Wang Wu"}"#,
        ))
        .await
        .unwrap();
    let resp = app
        .oneshot(json_request(
            &with_token("/message/send"),
            r#"{"touser":"wangwu|nobody","msgtype":"text","text":{"content":"hi"}}"#,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["errcode"], 0);
    assert_eq!(body["invaliduser"], "nobody");
    assert!(body["msgid"].as_str().is_some_and(|id| !id.is_empty()));
}

// --- media ---

#[tokio::test]
async fn upload_media_reports_size_and_filename() {
    let resp = app()
        .oneshot(multipart_request(
            &with_token("/media/upload?type=image"),
            &[("media", "a.png", &b"\x89PNG\r\n\x1a\n"[..])],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["errcode"], 0);
    assert_eq!(body["type"], "image");
    assert_eq!(body["media_id"], "8:a.png");
}

#[tokio::test]
async fn upload_empty_media_reports_errcode() {
    let resp = app()
        .oneshot(multipart_request(
            &with_token("/media/upload?type=file"),
            &[("media", "empty.txt", &b""[..])],
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["errcode"], ERR_EMPTY_MEDIA);
}

#[tokio::test]
async fn upload_with_wrong_field_name_is_bad_request() {
    let resp = app()
        .oneshot(multipart_request(
            &with_token("/media/upload?type=file"),
            &[("file", "a.txt", &b"abc"[..])],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_with_two_parts_is_bad_request() {
    let resp = app()
        .oneshot(multipart_request(
            &with_token("/media/upload?type=file"),
            &[("media", "a.txt", &b"abc"[..]), ("media", "b.txt", &b"def"[..])],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- failure routes ---

#[tokio::test]
async fn fixed_status_route_returns_requested_status() {
    let resp = app().oneshot(get_request("/cgi-bin/status/503")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(resp).await["errcode"], 0);
}

#[tokio::test]
async fn garbled_route_is_not_json() {
    let resp = app().oneshot(get_request("/cgi-bin/garbled")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}
