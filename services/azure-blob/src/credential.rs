use sasgen_core::utils::Redact;
use sasgen_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Shared key credential for an Azure storage account.
///
/// The key is the base64-encoded account key as shown in the portal. Both
/// fields are redacted in Debug output so credentials never reach logs.
#[derive(Clone)]
pub struct Credential {
    /// Azure storage account name.
    pub account_name: String,
    /// Azure storage account key, base64 encoded.
    pub account_key: String,
}

impl Credential {
    /// Create a new shared key credential.
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_key: account_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &Redact::from(&self.account_name))
            .field("account_key", &Redact::from(&self.account_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.account_name.is_empty() && !self.account_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("account", "a2V5").is_valid());
        assert!(!Credential::new("", "a2V5").is_valid());
        assert!(!Credential::new("account", "").is_valid());
    }

    #[test]
    fn test_debug_redacts_key() {
        let cred = Credential::new(
            "mystorageaccount",
            "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
        );

        let out = format!("{cred:?}");
        assert!(!out.contains("Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1"));
        assert!(out.contains("***"));
    }
}
