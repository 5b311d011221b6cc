//! End-to-end tests of the bonk authenticator against a mock server

use super::*;
use crate::auth::credentials::tests::FakeCredentialManager;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

const DOMAIN: &str = "www.example.com";
const VALIDATION_NAME: &str = "_acme-challenge.www.example.com";
const RECORD_PATH: &str = "/record/_acme-challenge.www.example.com/TXT/";

fn authenticator_for(server: &MockServer, action: &str) -> BonkAuthenticator {
    let mut manager = FakeCredentialManager::new(action);
    manager
        .creds
        .insert("endpoint".into(), format!("{}/", server.url("")));
    let credentials = Credentials::load(&manager).unwrap();
    authenticator(&credentials, &Config::default(), Span::none()).unwrap()
}

#[tokio::test]
async fn test_full_create_workflow() {
    let server = MockServer::start_async().await;
    let lookup_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RECORD_PATH);
            then.status(404).json_body(json!({"detail": "Not found."}));
        })
        .await;
    let zones_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/zone/").query_param("type", "external");
            then.status(200).json_body(json!([
                {"name": "example.org", "type": "external"},
                {"name": "example.com", "type": "external"},
            ]));
        })
        .await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/record/").json_body(json!({
                "zone": "example.com",
                "name": VALIDATION_NAME,
                "type": "TXT",
                "value": ["\"validation-token\""],
                "ttl": 60,
                "permissions": {"write": ["dns-writers"]},
            }));
            then.status(201).json_body(json!({}));
        })
        .await;

    let auth = authenticator_for(&server, "record");
    auth.perform(DOMAIN, VALIDATION_NAME, "validation-token")
        .await
        .unwrap();

    lookup_mock.assert_async().await;
    zones_mock.assert_async().await;
    create_mock.assert_async().await;
}

#[tokio::test]
async fn test_full_patch_workflow() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RECORD_PATH);
            then.status(200).json_body(json!({
                "zone": "example.com",
                "name": VALIDATION_NAME,
                "type": "TXT",
                "value": ["\"\""],
                "ttl": 60,
                "permissions": {"write": ["dns-writers"]},
            }));
        })
        .await;
    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path(RECORD_PATH)
                .json_body(json!({"value": ["\"validation-token\""]}));
            then.status(200).json_body(json!({}));
        })
        .await;

    let auth = authenticator_for(&server, "value");
    auth.perform(DOMAIN, VALIDATION_NAME, "validation-token")
        .await
        .unwrap();
    patch_mock.assert_async().await;
}

#[tokio::test]
async fn test_workflow_with_invalid_credentials() {
    let server = MockServer::start_async().await;
    let lookup_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RECORD_PATH);
            then.status(401)
                .json_body(json!({"detail": "Invalid username/password."}));
        })
        .await;
    let zones_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/zone/");
            then.status(200).json_body(json!([]));
        })
        .await;

    let auth = authenticator_for(&server, "record");
    let result = auth.perform(DOMAIN, VALIDATION_NAME, "validation-token").await;
    assert!(matches!(result, Err(Error::Auth)));
    lookup_mock.assert_async().await;
    zones_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_cleanup_record_workflow() {
    let server = MockServer::start_async().await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path(RECORD_PATH);
            then.status(204);
        })
        .await;

    let auth = authenticator_for(&server, "record");
    auth.cleanup(DOMAIN, VALIDATION_NAME, "validation-token")
        .await
        .unwrap();
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn test_cleanup_value_workflow() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RECORD_PATH);
            then.status(200).json_body(json!({
                "zone": "example.com",
                "name": VALIDATION_NAME,
                "type": "TXT",
                "value": ["\"other\"", "\"validation-token\""],
                "ttl": 60,
            }));
        })
        .await;
    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path(RECORD_PATH)
                .json_body(json!({"value": ["\"other\""]}));
            then.status(200).json_body(json!({}));
        })
        .await;

    let auth = authenticator_for(&server, "value");
    auth.cleanup(DOMAIN, VALIDATION_NAME, "validation-token")
        .await
        .unwrap();
    patch_mock.assert_async().await;
}

#[tokio::test]
async fn test_workflow_with_api_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path(RECORD_PATH);
            then.status(500).body("database is locked");
        })
        .await;

    let auth = authenticator_for(&server, "record");
    let result = auth.cleanup(DOMAIN, VALIDATION_NAME, "validation-token").await;
    match result {
        Err(Error::Api { url, status, body, .. }) => {
            assert!(url.ends_with(RECORD_PATH));
            assert_eq!(status, Some(StatusCode::INTERNAL_SERVER_ERROR));
            assert_eq!(body, "database is locked");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let mut manager = FakeCredentialManager::new("record");
    manager
        .creds
        .insert("endpoint".into(), "http://127.0.0.1:9".into());
    let credentials = Credentials::load(&manager).unwrap();
    let auth = authenticator(&credentials, &Config::default(), Span::none()).unwrap();

    let result = auth.perform(DOMAIN, VALIDATION_NAME, "validation-token").await;
    assert!(matches!(
        result,
        Err(Error::Api { message: "Unable to reach bonk", .. })
    ));
}
