use std::fmt;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Client address as seen through proxies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientAddr {
    pub ip: Option<String>,
    pub port: Option<String>,
}

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.ip, &self.port) {
            (Some(ip), Some(port)) => write!(f, "{ip}:{port}"),
            (Some(ip), None) => write!(f, "{ip}"),
            _ => write!(f, "unknown"),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolve the client address from proxy headers, falling back to the socket peer.
///
/// `cf-connecting-ip` wins over `x-forwarded-for`, of which only the first entry
/// counts. `x-forwarded-port` overrides the peer port.
pub fn client_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientAddr {
    let forwarded_ip = header_str(headers, "cf-connecting-ip")
        .or_else(|| header_str(headers, "x-forwarded-for"))
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string());

    let forwarded_port = header_str(headers, "x-forwarded-port").map(str::to_string);

    ClientAddr {
        ip: forwarded_ip.or_else(|| peer.map(|p| p.ip().to_string())),
        port: forwarded_port.or_else(|| peer.map(|p| p.port().to_string())),
    }
}

pub async fn real_ip(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let addr = client_addr(request.headers(), peer);
    request.extensions_mut().insert(addr);

    next.run(request).await
}
