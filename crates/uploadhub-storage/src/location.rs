//! Deterministic retrieval URL construction for S3-compatible stores.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in an object key path (RFC 3986 unreserved + `/`).
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode an object key for use in a URL path.
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key.trim_start_matches('/'), KEY_ENCODE_SET).to_string()
}

/// Build the unsigned GET URL of an object.
///
/// With a custom `endpoint` or `path_style` the URL is
/// `{endpoint}/{bucket}/{key}`; otherwise the AWS virtual-hosted form
/// `https://{bucket}.s3.{region}.amazonaws.com/{key}` is produced.
pub fn unsigned_object_url(
    endpoint: &str,
    region: &str,
    bucket: &str,
    key: &str,
    path_style: bool,
) -> String {
    let key = encode_key(key);
    let endpoint = endpoint.trim_end_matches('/');

    if endpoint.is_empty() {
        if path_style {
            return format!("https://s3.{region}.amazonaws.com/{bucket}/{key}");
        }
        return format!("https://{bucket}.s3.{region}.amazonaws.com/{key}");
    }

    if path_style {
        return format!("{endpoint}/{bucket}/{key}");
    }

    match endpoint.split_once("://") {
        Some((scheme, host)) => format!("{scheme}://{bucket}.{host}/{key}"),
        None => format!("https://{bucket}.{endpoint}/{key}"),
    }
}
