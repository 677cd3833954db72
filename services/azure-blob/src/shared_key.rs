use std::fmt::Write;

use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;

use sasgen_core::hash::{base64_decode, base64_hmac_sha256};
use sasgen_core::time::{format_http_date, now, DateTime};
use sasgen_core::Result;

use crate::constants::{CONTENT_MD5, X_MS_DATE};

/// Signer implementing [Azure Storage Shared Key authorization][1] for blob
/// service requests.
///
/// [1]: https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key
#[derive(Debug, Default)]
pub struct SharedKeySigner {
    time: Option<DateTime>,
}

impl SharedKeySigner {
    /// Create a signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request in place, stamping `x-ms-date` and `Authorization`.
    pub fn sign(&self, parts: &mut Parts, account_name: &str, account_key: &str) -> Result<()> {
        let now_time = self.time.unwrap_or_else(now);
        parts
            .headers
            .insert(X_MS_DATE, format_http_date(now_time).parse()?);

        let string_to_sign = string_to_sign(parts, account_name)?;
        let decode_content = base64_decode(account_key)?;
        let signature = base64_hmac_sha256(&decode_content, string_to_sign.as_bytes());

        parts.headers.insert(header::AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("SharedKey {account_name}:{signature}").parse()?;
            value.set_sensitive(true);
            value
        });

        Ok(())
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
fn string_to_sign(parts: &Parts, account_name: &str) -> Result<String> {
    let mut s = String::with_capacity(128);

    writeln!(&mut s, "{}", parts.method.as_str())?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::CONTENT_ENCODING)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::CONTENT_LANGUAGE)?)?;
    writeln!(
        &mut s,
        "{}",
        header_or_default(parts, &header::CONTENT_LENGTH)
            .map(|v| if v == "0" { "" } else { v })?
    )?;
    writeln!(&mut s, "{}", header_or_default(parts, &CONTENT_MD5.parse()?)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::CONTENT_TYPE)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::DATE)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::IF_MODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::IF_MATCH)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::IF_NONE_MATCH)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::IF_UNMODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", header_or_default(parts, &header::RANGE)?)?;
    writeln!(&mut s, "{}", canonicalize_headers(parts))?;
    write!(&mut s, "{}", canonicalize_resource(parts, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

fn header_or_default<'a>(parts: &'a Parts, key: &header::HeaderName) -> Result<&'a str> {
    match parts.headers.get(key) {
        Some(v) => Ok(v.to_str()?),
        None => Ok(""),
    }
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_headers(parts: &Parts) -> String {
    let mut headers: Vec<(String, String)> = parts
        .headers
        .iter()
        // Only headers that start with x-ms- take part.
        .filter(|(k, _)| k.as_str().starts_with("x-ms-"))
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                String::from_utf8_lossy(v.as_bytes()).trim().to_string(),
            )
        })
        .collect();
    headers.sort();

    headers
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<String>>()
        .join("\n")
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(parts: &Parts, account_name: &str) -> String {
    let path = parts.uri.path();

    let query = parts.uri.query().unwrap_or_default();
    if query.is_empty() {
        return format!("/{account_name}{path}");
    }

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
        .collect();
    pairs.sort();

    let query_lines = pairs
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<String>>()
        .join("\n");

    format!("/{account_name}{path}\n{query_lines}")
}
