use async_trait::async_trait;
use sasgen_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;
use crate::Config;

/// Load credential from a [`Config`].
///
/// Yields nothing when the config is missing either half of the shared key
/// pair, so a chain can continue with other sources.
#[derive(Clone, Debug, Default)]
pub struct ConfigCredentialProvider {
    config: Config,
}

impl ConfigCredentialProvider {
    /// Create a provider from the given config.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        if let (Some(account_name), Some(account_key)) =
            (&self.config.account_name, &self.config.account_key)
        {
            if !account_name.is_empty() && !account_key.is_empty() {
                return Ok(Some(Credential::new(account_name, account_key)));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_credential_provider() {
        let config = Config::new()
            .with_account_name("testaccount")
            .with_account_key("dGVzdF9rZXk=");
        let provider = ConfigCredentialProvider::new(config);

        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .expect("credential must be returned");
        assert_eq!(cred.account_name, "testaccount");
        assert_eq!(cred.account_key, "dGVzdF9rZXk=");
    }

    #[tokio::test]
    async fn test_partial_config_yields_nothing() {
        let config = Config::new().with_account_name("testaccount");
        let provider = ConfigCredentialProvider::new(config);

        let cred = provider.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_empty_values_yield_nothing() {
        let config = Config::new().with_account_name("").with_account_key("");
        let provider = ConfigCredentialProvider::new(config);

        let cred = provider.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }
}
