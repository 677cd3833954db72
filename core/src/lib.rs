//! Core components for minting storage access tokens.
//!
//! This crate provides the foundational types and traits shared by the
//! sasgen service crates. It defines the abstractions that keep token
//! issuance testable and free of hidden I/O.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: A container that holds implementations for HTTP sending
//!   and environment access
//! - **Traits**: Abstract interfaces for credential loading
//!   ([`ProvideCredential`]) and credential validation ([`SigningCredential`])
//! - **Utilities**: Hashing, time, and redaction helpers used by the signers
//!
//! ## Example
//!
//! ```no_run
//! use sasgen_core::{Context, OsEnv, ProvideCredential, Result, SigningCredential};
//! use async_trait::async_trait;
//!
//! // Define your credential type
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     name: String,
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.name.is_empty() && !self.key.is_empty()
//!     }
//! }
//!
//! // Implement a credential loader
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             name: "my-account".to_string(),
//!             key: "my-account-key".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! // Create a context with your implementations
//! let ctx = Context::new().with_env(OsEnv);
//!
//! let cred = MyLoader.provide_credential(&ctx).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SigningCredential};

mod error;
pub use error::{Error, ErrorKind, Result};
