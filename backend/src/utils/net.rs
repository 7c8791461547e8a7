use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::HeaderMap};

/// Caller address for audit records: proxy headers first, then the socket peer.
pub fn client_addr(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    extract_ip(headers).or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()))
}

fn extract_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(',').next().unwrap_or(value).trim().to_string())
        .filter(|value| !value.is_empty())
}
