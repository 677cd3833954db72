use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use log::debug;

use sasgen_core::{Context, Error, Result};

use crate::constants::{STORAGE_API_VERSION, X_MS_VERSION};
use crate::credential::Credential;
use crate::shared_key::SharedKeySigner;

/// Create the container if it does not exist yet.
///
/// Issues a shared-key-signed `PUT {endpoint}/{container}?restype=container`.
/// Both `201 Created` and `409 Conflict` count as success so the call is
/// idempotent; any other status becomes a storage error carrying the
/// response body.
pub async fn ensure_container(
    ctx: &Context,
    cred: &Credential,
    endpoint: &str,
    container: &str,
) -> Result<()> {
    let endpoint = endpoint.trim_end_matches('/');
    let uri = format!("{endpoint}/{container}?restype=container");

    let req = Request::builder()
        .method(Method::PUT)
        .uri(&uri)
        .header(header::CONTENT_LENGTH, "0")
        .header(X_MS_VERSION, STORAGE_API_VERSION)
        .body(Bytes::new())?;

    let (mut parts, body) = req.into_parts();
    SharedKeySigner::new().sign(&mut parts, &cred.account_name, &cred.account_key)?;
    let req = Request::from_parts(parts, body);

    let resp = ctx.http_send(req).await?;
    match resp.status() {
        StatusCode::CREATED => {
            debug!("created container {container}");
            Ok(())
        }
        StatusCode::CONFLICT => {
            // Container already exists.
            debug!("container {container} already exists");
            Ok(())
        }
        status => {
            let body = String::from_utf8_lossy(resp.body());
            Err(Error::storage(format!(
                "creating container {container} failed with status {status}: {body}"
            )))
        }
    }
}
