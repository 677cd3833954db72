use crate::{Context, Result};
use std::fmt::{self, Debug};

/// SigningCredential is the trait implemented by credentials used to sign tokens.
pub trait SigningCredential: Clone + Debug + Send + Sync + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to load credentials from the environment.
///
/// Services may require different credentials, for example, Azure Storage
/// requires an account name and key while other clouds use key pairs.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + 'static;

    /// Load credential from the given context.
    ///
    /// - Returns `Ok(Some(credential))` if the provider found a credential.
    /// - Returns `Ok(None)` if the provider has nothing to offer; callers
    ///   should try the next source.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// A chain of credential providers that will be tried in order.
///
/// The first provider that returns a credential wins. Providers that fail or
/// return nothing are skipped.
pub struct ProvideCredentialChain<C> {
    providers: Vec<Box<dyn ProvideCredential<Credential = C>>>,
}

impl<C: Send + Sync + 'static> ProvideCredentialChain<C> {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a credential provider to the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = C> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl<C: Send + Sync + 'static> Default for ProvideCredentialChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Debug for ProvideCredentialChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers_count", &self.providers.len())
            .finish()
    }
}

#[async_trait::async_trait]
impl<C: Send + Sync + 'static> ProvideCredential for ProvideCredentialChain<C> {
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            log::debug!("trying credential provider: {provider:?}");

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    log::debug!("loaded credential from provider: {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("credential provider {provider:?} failed: {e:?}");
                    continue;
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Clone, Debug)]
    struct TestCredential {
        key: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.key.is_empty()
        }
    }

    #[derive(Debug)]
    struct SuccessProvider {
        key: String,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for SuccessProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(Some(TestCredential {
                key: self.key.clone(),
            }))
        }
    }

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait::async_trait]
    impl ProvideCredential for EmptyProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct FailProvider;

    #[async_trait::async_trait]
    impl ProvideCredential for FailProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            Err(Error::unexpected("provider failed"))
        }
    }

    #[tokio::test]
    async fn test_chain_returns_first_success() {
        let ctx = Context::new();
        let chain = ProvideCredentialChain::new()
            .push(FailProvider)
            .push(EmptyProvider)
            .push(SuccessProvider {
                key: "first".to_string(),
            })
            .push(SuccessProvider {
                key: "unused".to_string(),
            });

        let cred = chain.provide_credential(&ctx).await.unwrap().unwrap();
        assert_eq!(cred.key, "first");
    }

    #[tokio::test]
    async fn test_chain_returns_none_when_exhausted() {
        let ctx = Context::new();
        let chain: ProvideCredentialChain<TestCredential> = ProvideCredentialChain::new()
            .push(FailProvider)
            .push(EmptyProvider);

        assert!(chain.provide_credential(&ctx).await.unwrap().is_none());
    }

    #[test]
    fn test_option_credential_validity() {
        let valid = Some(TestCredential {
            key: "k".to_string(),
        });
        assert!(valid.is_valid());

        let invalid = Some(TestCredential {
            key: String::new(),
        });
        assert!(!invalid.is_valid());

        let missing: Option<TestCredential> = None;
        assert!(!missing.is_valid());
    }
}
