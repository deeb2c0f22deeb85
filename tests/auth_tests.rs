//! Unit tests for the bearer token extractor

use axum::extract::FromRequestParts;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::IntoResponse;
use notecards_api::api::BearerToken;

#[tokio::test]
async fn test_bearer_token_valid() {
    let req = Request::builder()
        .header("Authorization", "Bearer 0123abcd")
        .body(())
        .unwrap();

    let (mut parts, _) = req.into_parts();
    let result = BearerToken::from_request_parts(&mut parts, &()).await;

    assert_eq!(result.unwrap().0, "0123abcd");
}

#[tokio::test]
async fn test_bearer_token_missing_header() {
    let req = Request::builder().body(()).unwrap();

    let (mut parts, _) = req.into_parts();
    let result = BearerToken::from_request_parts(&mut parts, &()).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Unauthorized");
    assert!(json["details"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_bearer_token_wrong_scheme() {
    for header in ["Basic dXNlcjpwYXNz", "Bearer ", "0123abcd"] {
        let req = Request::builder()
            .header("Authorization", header)
            .body(())
            .unwrap();

        let (mut parts, _) = req.into_parts();
        let result = BearerToken::from_request_parts(&mut parts, &()).await;

        assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED, "{header}");
    }
}

#[tokio::test]
async fn test_bearer_token_invalid_utf8() {
    let mut req = Request::builder().body(()).unwrap();
    req.headers_mut().insert(
        "Authorization",
        HeaderValue::from_bytes(&[0xFF, 0xFE]).unwrap(),
    );

    let (mut parts, _) = req.into_parts();
    let result = BearerToken::from_request_parts(&mut parts, &()).await;

    assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}
