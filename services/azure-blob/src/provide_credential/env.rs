use async_trait::async_trait;
use log::warn;
use sasgen_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;
use crate::Config;

/// Load credential from environment variables.
///
/// Looks at the dedicated account variables first, then falls back to
/// parsing `AZURE_STORAGE_CONNECTION_STRING`.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new environment credential provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let account_name = envs
            .get(AZBLOB_ACCOUNT_NAME)
            .or_else(|| envs.get(AZURE_STORAGE_ACCOUNT_NAME));
        let account_key = envs
            .get(AZBLOB_ACCOUNT_KEY)
            .or_else(|| envs.get(AZURE_STORAGE_ACCOUNT_KEY));

        if let (Some(account_name), Some(account_key)) = (account_name, account_key) {
            return Ok(Some(Credential::new(account_name, account_key)));
        }

        if let Some(conn_str) = envs.get(AZURE_STORAGE_CONNECTION_STRING) {
            match Config::try_from_connection_string(conn_str) {
                Ok(config) => {
                    if let (Some(account_name), Some(account_key)) =
                        (config.account_name, config.account_key)
                    {
                        return Ok(Some(Credential::new(account_name, account_key)));
                    }
                }
                Err(e) => {
                    warn!("ignoring malformed {AZURE_STORAGE_CONNECTION_STRING}: {e}");
                }
            }
        }

        Ok(None)
    }
}
