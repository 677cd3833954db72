use async_trait::async_trait;
use sasgen_core::{Context, ProvideCredential, Result};

use crate::credential::Credential;

/// Provide a fixed credential supplied by the caller.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider from an account name and key.
    pub fn new(account_name: &str, account_key: &str) -> Self {
        Self {
            credential: Credential::new(account_name, account_key),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider = StaticCredentialProvider::new("myaccount", "bXlrZXk=");
        let ctx = Context::new();

        let cred = provider
            .provide_credential(&ctx)
            .await
            .unwrap()
            .expect("credential must be returned");
        assert_eq!(cred.account_name, "myaccount");
        assert_eq!(cred.account_key, "bXlrZXk=");
    }
}
