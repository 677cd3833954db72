use async_trait::async_trait;
use sasgen_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::provide_credential::{ConfigCredentialProvider, EnvCredentialProvider};
use crate::{Config, Credential};

/// Default provider that tries multiple credential sources in order.
///
/// The default provider attempts to load credentials from the following
/// sources in order:
/// 1. Explicit configuration (account name and key)
/// 2. Environment variables, including `AZURE_STORAGE_CONNECTION_STRING`
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl DefaultCredentialProvider {
    /// Create a default provider seeded with the given config.
    pub fn new(config: Config) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config))
            .push(EnvCredentialProvider::new());

        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sasgen_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_config_takes_priority_over_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                ("AZBLOB_ACCOUNT_NAME".to_string(), "envaccount".to_string()),
                ("AZBLOB_ACCOUNT_KEY".to_string(), "ZW52a2V5".to_string()),
            ]),
        });

        let config = Config::new()
            .with_account_name("cfgaccount")
            .with_account_key("Y2Zna2V5");
        let provider = DefaultCredentialProvider::new(config);

        let cred = provider
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be returned");
        assert_eq!(cred.account_name, "cfgaccount");
    }

    #[tokio::test]
    async fn test_falls_back_to_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                ("AZBLOB_ACCOUNT_NAME".to_string(), "envaccount".to_string()),
                ("AZBLOB_ACCOUNT_KEY".to_string(), "ZW52a2V5".to_string()),
            ]),
        });

        let provider = DefaultCredentialProvider::new(Config::default());

        let cred = provider
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be returned");
        assert_eq!(cred.account_name, "envaccount");
    }

    #[tokio::test]
    async fn test_yields_nothing_when_no_source() {
        let provider = DefaultCredentialProvider::new(Config::default());
        let cred = provider.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }
}
