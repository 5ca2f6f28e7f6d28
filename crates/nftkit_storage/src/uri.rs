//! Canonical `ipfs://<cid>` identifiers.

pub const IPFS_SCHEME: &str = "ipfs://";

/// Remove a leading `ipfs://` if present.
pub fn strip_prefix(uri_or_cid: &str) -> &str {
    uri_or_cid.strip_prefix(IPFS_SCHEME).unwrap_or(uri_or_cid)
}

/// Return the canonical `ipfs://<cid>` form.
///
/// Also collapses `ipfs://ipfs/<cid>` (emitted by some pinning tools) and the
/// bare path form `ipfs/<cid>`.
pub fn ensure_prefix(cid_or_uri: &str) -> String {
    let rest = strip_prefix(cid_or_uri);
    let cid = rest.strip_prefix("ipfs/").unwrap_or(rest);
    format!("{IPFS_SCHEME}{cid}")
}

/// HTTP URL for the content behind `uri_or_cid` on the given gateway.
pub fn gateway_url(gateway: &str, uri_or_cid: &str) -> String {
    let canonical = ensure_prefix(uri_or_cid);
    format!(
        "{}/ipfs/{}",
        gateway.trim_end_matches('/'),
        strip_prefix(&canonical)
    )
}
