use std::fmt;
use std::sync::Arc;

use sasgen_core::time::{now, truncate_seconds, DateTime};
use sasgen_core::utils::Redact;
use sasgen_core::{Context, Error, ProvideCredential, Result, SigningCredential};

use crate::container::ensure_container;
use crate::credential::Credential;
use crate::permissions::{ContainerSasOptions, SasPermissions};
use crate::retry::RetryPolicy;
use crate::service_sas::{SasResource, ServiceSharedAccessSignature};

/// A signed SAS token, ready to append to a resource URL as a query string.
///
/// The token is opaque: the expiry is baked into the signature and not
/// separately retrievable. Debug output is redacted so tokens never leak
/// into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SasToken(String);

impl SasToken {
    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SasToken")
            .field(&Redact::from(&self.0))
            .finish()
    }
}

/// Issues SAS tokens for Azure Blob Storage.
///
/// Each issue call is self-contained: the credential is resolved freshly on
/// every attempt and nothing is cached across calls. Concurrent calls share
/// no mutable state, so their retry loops run fully independently.
pub struct TokenIssuer {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    retry: RetryPolicy,
    endpoint: Option<String>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("retry", &self.retry)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer with the default retry policy (3 retries, 1s delay).
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = Credential> + 'static,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            retry: RetryPolicy::default(),
            endpoint: None,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the blob service endpoint.
    ///
    /// Defaults to `https://{account}.blob.core.windows.net`. Point this at
    /// Azurite or a sovereign cloud endpoint when needed.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Issue a read-only SAS token scoped to a single blob.
    ///
    /// The token expires `validity_hours` from now, truncated to whole
    /// seconds. `validity_hours` is not validated; passing zero mints an
    /// already-expired token.
    pub async fn issue_blob_token(
        &self,
        container: &str,
        blob: &str,
        validity_hours: u32,
    ) -> Result<SasToken> {
        self.retry
            .run("issue blob token", move || async move {
                let cred = self.resolve_credential().await?;
                let expiry = expiry_in(validity_hours);

                let resource = SasResource::Blob {
                    container: container.to_string(),
                    blob: blob.to_string(),
                };
                self.sign(&cred, resource, SasPermissions::read_only(), expiry)
            })
            .await
    }

    /// Issue a SAS token scoped to a whole container, creating the
    /// container first when it does not exist.
    ///
    /// Permissions derive from `opts`: read always, list per `list_access`,
    /// write and delete per `write_access`. The container-create step runs
    /// inside the retried region, so a transient failure there is retried
    /// like a signing failure.
    pub async fn issue_container_token(
        &self,
        container: &str,
        validity_hours: u32,
        opts: &ContainerSasOptions,
    ) -> Result<SasToken> {
        self.retry
            .run("issue container token", move || async move {
                let cred = self.resolve_credential().await?;
                let endpoint = self.endpoint(&cred);
                ensure_container(&self.ctx, &cred, &endpoint, container).await?;

                let expiry = expiry_in(validity_hours);
                let resource = SasResource::Container {
                    container: container.to_string(),
                };
                self.sign(&cred, resource, opts.permissions(), expiry)
            })
            .await
    }

    async fn resolve_credential(&self) -> Result<Credential> {
        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential source available"))?;

        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "credential is incomplete: account name and key are both required",
            ));
        }

        Ok(cred)
    }

    fn endpoint(&self, cred: &Credential) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.blob.core.windows.net", cred.account_name),
        }
    }

    fn sign(
        &self,
        cred: &Credential,
        resource: SasResource,
        permissions: SasPermissions,
        expiry: DateTime,
    ) -> Result<SasToken> {
        let sign = ServiceSharedAccessSignature::new(
            cred.account_name.clone(),
            cred.account_key.clone(),
            resource,
            permissions,
            expiry,
        );
        Ok(SasToken(sign.token_string()?))
    }
}

fn expiry_in(validity_hours: u32) -> DateTime {
    truncate_seconds(now() + chrono::Duration::hours(validity_hours as i64))
}
