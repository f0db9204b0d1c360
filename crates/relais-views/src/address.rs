//! URL normalisation for new views
//!
//! Input without a scheme is treated as a host name and gets `https://` in
//! front; bare IPv6 hosts are bracketed first. Only http(s) views are allowed.

use std::net::Ipv6Addr;
use url::Url;

use crate::error::ViewError;
use crate::Result;

/// Turn user input into the URL a view is opened with.
pub fn normalize_view_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ViewError::InvalidUrl("url cannot be empty".to_string()));
    }

    let candidate = if has_scheme(input) {
        input.to_string()
    } else {
        let (host, rest) = split_host_and_rest(input);
        if is_bare_ipv6(host) {
            format!("https://[{}]{}", host, rest)
        } else {
            format!("https://{}", input)
        }
    };

    let url = Url::parse(&candidate).map_err(|e| ViewError::InvalidUrl(format!("{input}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ViewError::InvalidUrl(format!(
                "{input}: unsupported scheme {other}"
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ViewError::InvalidUrl(format!("{input}: missing host")));
    }

    Ok(url)
}

/// `scheme://` only counts before the path, query or fragment starts.
fn has_scheme(input: &str) -> bool {
    input
        .find("://")
        .map_or(false, |idx| !input[..idx].contains(['/', '?', '#']))
}

fn is_bare_ipv6(host: &str) -> bool {
    !host.starts_with('[') && host.parse::<Ipv6Addr>().is_ok()
}

fn split_host_and_rest(input: &str) -> (&str, &str) {
    let mut cut = input.len();
    for ch in ['/', '?', '#'] {
        if let Some(idx) = input.find(ch) {
            if idx < cut {
                cut = idx;
            }
        }
    }

    input.split_at(cut)
}
