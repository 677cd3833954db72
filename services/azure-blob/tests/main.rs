use std::env;

use anyhow::Result;
use http::StatusCode;
use log::warn;
use reqwest::Client;
use sasgen_azure_blob::{ContainerSasOptions, StaticCredentialProvider, TokenIssuer};
use sasgen_core::{Context, OsEnv};
use sasgen_http_send_reqwest::ReqwestHttpSend;

fn init_issuer() -> Option<(TokenIssuer, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("SASGEN_LIVE_TEST").unwrap_or_default() != "on" {
        return None;
    }

    let account_name =
        env::var("SASGEN_ACCOUNT_NAME").expect("env SASGEN_ACCOUNT_NAME must set");
    let account_key = env::var("SASGEN_ACCOUNT_KEY").expect("env SASGEN_ACCOUNT_KEY must set");

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let provider = StaticCredentialProvider::new(&account_name, &account_key);

    let mut issuer = TokenIssuer::new(ctx, provider);
    let endpoint = match env::var("SASGEN_ENDPOINT") {
        Ok(endpoint) => {
            issuer = issuer.with_endpoint(&endpoint);
            endpoint
        }
        Err(_) => format!("https://{account_name}.blob.core.windows.net"),
    };

    Some((issuer, endpoint))
}

#[tokio::test]
async fn test_container_token_can_list_container() -> Result<()> {
    let Some((issuer, endpoint)) = init_issuer() else {
        warn!("SASGEN_LIVE_TEST is not set, skipped");
        return Ok(());
    };

    let token = issuer
        .issue_container_token("sasgen-live-test", 1, &ContainerSasOptions::default())
        .await?;

    // List blobs with the freshly minted token only, no shared key.
    let url = format!("{endpoint}/sasgen-live-test?restype=container&comp=list&{token}");
    let resp = Client::new().get(&url).send().await?;

    assert_eq!(StatusCode::OK, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_blob_token_scopes_to_single_blob() -> Result<()> {
    let Some((issuer, endpoint)) = init_issuer() else {
        warn!("SASGEN_LIVE_TEST is not set, skipped");
        return Ok(());
    };

    let token = issuer
        .issue_blob_token("sasgen-live-test", "not_exist_file", 1)
        .await?;

    // The token authorizes the request; the blob itself is absent.
    let url = format!("{endpoint}/sasgen-live-test/not_exist_file?{token}");
    let resp = Client::new().get(&url).send().await?;

    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    Ok(())
}
