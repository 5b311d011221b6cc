use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::auth::credentials::Credentials;
use crate::providers::bonk::error::BonkProviderError;
use crate::providers::bonk::types::*;

/// Status, url and raw body of one bonk call. Status handling is left to
/// the caller since every operation accepts a different set of codes.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BonkProviderError> {
        serde_json::from_str(&self.body).map_err(|source| BonkProviderError::Decode {
            url: self.url.clone(),
            status: self.status,
            body: self.body.clone(),
            source,
        })
    }
}

/// The five calls made against the bonk REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// `GET /record/{name}/TXT/`
    async fn get_record(&self, name: &str) -> Result<ApiResponse, BonkProviderError>;

    /// `GET /zone/?type={zone_type}`
    async fn list_zones(&self, zone_type: &str) -> Result<ApiResponse, BonkProviderError>;

    /// `POST /record/`
    async fn create_record(
        &self,
        req: &CreateRecordRequest,
    ) -> Result<ApiResponse, BonkProviderError>;

    /// `PATCH /record/{name}/TXT/`
    async fn patch_record(
        &self,
        name: &str,
        req: &PatchRecordRequest,
    ) -> Result<ApiResponse, BonkProviderError>;

    /// `DELETE /record/{name}/TXT/`
    async fn delete_record(&self, name: &str) -> Result<ApiResponse, BonkProviderError>;
}

pub struct BonkConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub timeout: Option<Duration>,
}

impl BonkConfig {
    pub fn from_credentials(credentials: &Credentials, timeout: Option<Duration>) -> Self {
        BonkConfig {
            endpoint: credentials.endpoint.clone(),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            timeout,
        }
    }
}

pub struct BonkClient {
    config: BonkConfig,
    client: Client,
}

impl BonkClient {
    pub fn new(config: BonkConfig) -> Result<Self, BonkProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn record_url(&self, name: &str) -> String {
        format!("{}/record/{}/{}/", self.config.endpoint, name, TXT)
    }

    async fn send(
        &self,
        url: String,
        request: RequestBuilder,
    ) -> Result<ApiResponse, BonkProviderError> {
        let response = request
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%url, status = status.as_u16(), "bonk response");
        Ok(ApiResponse { url, status, body })
    }
}

#[async_trait]
impl RecordApi for BonkClient {
    async fn get_record(&self, name: &str) -> Result<ApiResponse, BonkProviderError> {
        let url = self.record_url(name);
        self.send(url.clone(), self.client.get(&url)).await
    }

    async fn list_zones(&self, zone_type: &str) -> Result<ApiResponse, BonkProviderError> {
        let url = format!("{}/zone/", self.config.endpoint);
        let request = self.client.get(&url).query(&[("type", zone_type)]);
        self.send(url, request).await
    }

    async fn create_record(
        &self,
        req: &CreateRecordRequest,
    ) -> Result<ApiResponse, BonkProviderError> {
        let url = format!("{}/record/", self.config.endpoint);
        self.send(url.clone(), self.client.post(&url).json(req)).await
    }

    async fn patch_record(
        &self,
        name: &str,
        req: &PatchRecordRequest,
    ) -> Result<ApiResponse, BonkProviderError> {
        let url = self.record_url(name);
        self.send(url.clone(), self.client.patch(&url).json(req)).await
    }

    async fn delete_record(&self, name: &str) -> Result<ApiResponse, BonkProviderError> {
        let url = self.record_url(name);
        self.send(url.clone(), self.client.delete(&url)).await
    }
}
