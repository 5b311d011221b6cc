//! bonk provider implementation

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{ApiResponse, BonkClient, BonkConfig, RecordApi};
pub use types::{BonkRecord, BonkZone, CreateRecordRequest, PatchRecordRequest};

// --- ChallengeAuthenticator implementation backed by the bonk API ---
use crate::auth::credentials::{CleanupAction, Credentials};
use crate::config::Config;
use crate::core::provider::ChallengeAuthenticator;
use crate::core::record::{quote, with_value, without_value};
use crate::core::zone::select_zone;
use crate::error::Error;
use async_trait::async_trait;
use error::map_error;
use reqwest::StatusCode;
use tracing::{Instrument, Span, debug, error, info, info_span};
use types::EXTERNAL_ZONE_TYPE;

pub const NAME: &str = "dns-bonk";
pub const DESCRIPTION: &str =
    "Obtain certificates using a DNS TXT record (if you are using bonk for DNS).";
pub const MORE_INFO: &str = "This plugin uses the bonk API to fulfill a dns-01 challenge.";

/// Build an authenticator talking to the endpoint in `credentials`.
pub fn authenticator(
    credentials: &Credentials,
    config: &Config,
    span: Span,
) -> Result<BonkAuthenticator, Error> {
    let client = BonkClient::new(BonkConfig::from_credentials(credentials, config.timeout))
        .map_err(map_error)?;
    Ok(BonkAuthenticator::new(client, credentials, config.ttl, span))
}

pub struct BonkAuthenticator<A: RecordApi = BonkClient> {
    api: A,
    group: String,
    cleanup_action: CleanupAction,
    ttl: u32,
    span: Span,
}

impl<A: RecordApi> BonkAuthenticator<A> {
    pub fn new(api: A, credentials: &Credentials, ttl: u32, span: Span) -> Self {
        Self {
            api,
            group: credentials.group.clone(),
            cleanup_action: credentials.cleanup_action,
            ttl,
            span,
        }
    }

    async fn add_value(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let response = self
            .api
            .get_record(validation_name)
            .await
            .map_err(map_error)?;

        match response.status {
            StatusCode::NOT_FOUND => self.create(domain, validation_name, validation).await,
            StatusCode::OK => {
                let record: BonkRecord = response.json().map_err(map_error)?;
                let values = with_value(&record.value, validation);
                self.patch_values(validation_name, values, "Unable to update record")
                    .await
            }
            _ => Err(reject(&response, "Invalid response from bonk")),
        }
    }

    async fn create(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let response = self
            .api
            .list_zones(EXTERNAL_ZONE_TYPE)
            .await
            .map_err(map_error)?;
        check_status(&response, &[StatusCode::OK], "Invalid response from bonk")?;
        let zones: Vec<BonkZone> = response.json().map_err(map_error)?;

        let Some(zone) = select_zone(domain, zones.iter().map(|z| z.name.as_str())) else {
            error!(domain, "Unable to find zone for domain");
            return Err(Error::ZoneNotFound {
                domain: domain.to_string(),
            });
        };

        let record = CreateRecordRequest::txt(
            zone,
            validation_name,
            quote(validation),
            self.ttl,
            &self.group,
        );
        debug!(?record, "Creating record");
        let response = self.api.create_record(&record).await.map_err(map_error)?;
        check_status(&response, &[StatusCode::CREATED], "Unable to create record")?;
        info!(zone, validation_name, "Created TXT record");
        Ok(())
    }

    async fn remove_record(&self, validation_name: &str) -> Result<(), Error> {
        let response = self
            .api
            .delete_record(validation_name)
            .await
            .map_err(map_error)?;
        check_status(
            &response,
            &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND],
            "Unable to delete record",
        )?;
        info!(validation_name, "Deleted TXT record");
        Ok(())
    }

    async fn remove_value(&self, validation_name: &str, validation: &str) -> Result<(), Error> {
        let response = self
            .api
            .get_record(validation_name)
            .await
            .map_err(map_error)?;
        check_status(&response, &[StatusCode::OK], "Unable to delete value")?;
        let record: BonkRecord = response.json().map_err(map_error)?;
        let values = without_value(&record.value, validation);
        self.patch_values(validation_name, values, "Unable to delete value")
            .await
    }

    async fn patch_values(
        &self,
        validation_name: &str,
        value: Vec<String>,
        failure: &'static str,
    ) -> Result<(), Error> {
        let patch = PatchRecordRequest { value };
        debug!(validation_name, ?patch, "Patching record");
        let response = self
            .api
            .patch_record(validation_name, &patch)
            .await
            .map_err(map_error)?;
        check_status(&response, &[StatusCode::OK], failure)?;
        info!(validation_name, values = patch.value.len(), "Updated TXT record");
        Ok(())
    }
}

/// Ok when the status of `response` is one of `accepted`.
fn check_status(
    response: &ApiResponse,
    accepted: &[StatusCode],
    failure: &'static str,
) -> Result<(), Error> {
    if accepted.contains(&response.status) {
        Ok(())
    } else {
        Err(reject(response, failure))
    }
}

/// Log the full response and turn it into the error handed to the host.
/// 401 always becomes an authentication error.
fn reject(response: &ApiResponse, failure: &'static str) -> Error {
    error!(
        url = %response.url,
        status = response.status.as_u16(),
        body = %response.body,
        "{failure}"
    );
    if response.status == StatusCode::UNAUTHORIZED {
        Error::Auth
    } else {
        Error::api(
            failure,
            response.url.clone(),
            Some(response.status),
            response.body.clone(),
        )
    }
}

#[async_trait]
impl<A: RecordApi> ChallengeAuthenticator for BonkAuthenticator<A> {
    fn name(&self) -> &str {
        NAME
    }

    async fn perform(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let span = info_span!(parent: &self.span, "perform", domain, validation_name);
        self.add_value(domain, validation_name, validation)
            .instrument(span)
            .await
    }

    async fn cleanup(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let span = info_span!(parent: &self.span, "cleanup", domain, validation_name);
        match self.cleanup_action {
            CleanupAction::Record => self.remove_record(validation_name).instrument(span).await,
            CleanupAction::Value => {
                self.remove_value(validation_name, validation)
                    .instrument(span)
                    .await
            }
        }
    }
}
