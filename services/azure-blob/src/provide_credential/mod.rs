mod static_provider;
pub use static_provider::StaticCredentialProvider;

mod config;
pub use config::ConfigCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;

mod default;
pub use default::DefaultCredentialProvider;
