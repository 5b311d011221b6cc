use crate::error::Error;
use async_trait::async_trait;

/// Capability handed to the certificate workflow: publish a DNS-01
/// validation token and take it down again.
#[async_trait]
pub trait ChallengeAuthenticator: Send + Sync {
    fn name(&self) -> &str;

    /// Make sure the TXT record at `validation_name` contains `validation`.
    async fn perform(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error>;

    /// Remove `validation` (or the whole record, depending on the configured
    /// cleanup action) from `validation_name`.
    async fn cleanup(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error>;
}
