//! Azure Blob Storage SAS token issuer
//!
//! This crate mints shared access signature (SAS) tokens for Azure Blob
//! Storage:
//! - read-only tokens scoped to a single blob
//! - container tokens with optional write/list/delete permissions, creating
//!   the container first when it does not exist yet
//!
//! Token issuance runs under a bounded retry policy with a fixed delay
//! between attempts. Credentials are resolved freshly on every attempt and
//! are never cached.
//!
//! # Example
//!
//! ```rust,no_run
//! use sasgen_azure_blob::{StaticCredentialProvider, TokenIssuer};
//! use sasgen_core::{Context, OsEnv, Result};
//! use sasgen_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let provider = StaticCredentialProvider::new("myaccount", "bXlrZXk=");
//!     let issuer = TokenIssuer::new(ctx, provider);
//!
//!     // Read-only token for one blob, valid 24 hours.
//!     let token = issuer.issue_blob_token("genomics", "sample.bam", 24).await?;
//!     println!("{token}");
//!
//!     Ok(())
//! }
//! ```

mod constants;

mod config;
pub use config::Config;
mod connection_string;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    StaticCredentialProvider,
};

mod permissions;
pub use permissions::{ContainerSasOptions, SasPermissions};

mod service_sas;
pub use service_sas::{SasResource, ServiceSharedAccessSignature};

mod shared_key;
pub use shared_key::SharedKeySigner;

mod container;
pub use container::ensure_container;

mod retry;
pub use retry::RetryPolicy;

mod issuer;
pub use issuer::{SasToken, TokenIssuer};
