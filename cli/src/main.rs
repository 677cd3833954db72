//! sasgen
//!
//! Mint Azure Blob Storage SAS tokens from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Read-only token for one blob, valid 24 hours
//! sasgen blob genomics sample.bam --hours 24
//!
//! # Container token with write access, valid 48 hours
//! sasgen container results --hours 48 --write
//! ```
//!
//! Credentials come from `--account-name`/`--account-key`,
//! `--connection-string`, or the `AZBLOB_*`/`AZURE_STORAGE_*` environment
//! variables, in that order.

use clap::{Args, Parser, Subcommand};
use sasgen_azure_blob::{
    Config, ContainerSasOptions, DefaultCredentialProvider, SasToken, TokenIssuer,
};
use sasgen_core::{Context, OsEnv, Result};
use sasgen_http_send_reqwest::ReqwestHttpSend;

/// Exit status for storage failures, distinct from clap's usage errors.
const EXIT_STORAGE_FAILURE: i32 = 200;

#[derive(Parser)]
#[command(name = "sasgen")]
#[command(about = "Mint Azure Blob Storage SAS tokens")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AuthArgs {
    /// Storage account name
    #[arg(long, global = true)]
    account_name: Option<String>,

    /// Storage account key, base64 encoded
    #[arg(long, global = true)]
    account_key: Option<String>,

    /// Azure storage connection string
    #[arg(long, global = true)]
    connection_string: Option<String>,

    /// Blob service endpoint, e.g. for Azurite
    #[arg(long, global = true)]
    endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a read-only token for a single blob
    Blob {
        /// Container holding the blob
        container: String,

        /// Blob name
        blob: String,

        /// Token validity in hours
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Mint a token for a whole container, creating it if absent
    Container {
        /// Container name
        container: String,

        /// Token validity in hours
        #[arg(long, default_value_t = 24)]
        hours: u32,

        /// Grant write and delete permissions
        #[arg(long)]
        write: bool,

        /// Drop the list permission
        #[arg(long)]
        no_list: bool,
    },
}

impl AuthArgs {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.connection_string {
            Some(conn_str) => Config::try_from_connection_string(conn_str)?,
            None => Config::new(),
        };

        // Explicit flags win over connection string fields.
        if let Some(account_name) = self.account_name {
            config.account_name = Some(account_name);
        }
        if let Some(account_key) = self.account_key {
            config.account_key = Some(account_key);
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = Some(endpoint);
        }

        Ok(config)
    }
}

async fn run(cli: Cli) -> Result<SasToken> {
    let config = cli.auth.into_config()?;
    let endpoint = config.endpoint.clone();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let mut issuer = TokenIssuer::new(ctx, DefaultCredentialProvider::new(config));
    if let Some(endpoint) = endpoint {
        issuer = issuer.with_endpoint(endpoint);
    }

    match cli.command {
        Commands::Blob {
            container,
            blob,
            hours,
        } => issuer.issue_blob_token(&container, &blob, hours).await,
        Commands::Container {
            container,
            hours,
            write,
            no_list,
        } => {
            let opts = ContainerSasOptions {
                write_access: write,
                list_access: !no_list,
            };
            issuer.issue_container_token(&container, hours, &opts).await
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(token) => println!("{token}"),
        Err(e) => {
            // Scripts match on stdout and the 200 exit status.
            println!("Azure storage error: {e}");
            std::process::exit(EXIT_STORAGE_FAILURE);
        }
    }
}
