use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;

/// Binds `host:port`. The special host "*" means every interface,
/// IPv6 dual-stack when available and IPv4 otherwise.
pub async fn create_listener(host: &str, port: u16) -> std::io::Result<(String, TcpListener)> {
    if host == "*" {
        return create_wildcard_listener(port);
    }

    let addr = format!("{}:{}", host, port);
    tracing::info!("Attempting to bind server to {}...", addr);

    let tokio_listener = TcpListener::bind(&addr).await?;
    let bound = tokio_listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);

    Ok((bound, tokio_listener))
}

fn bind_socket(domain: Domain, addr: SocketAddr, dual_stack: bool) -> std::io::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if dual_stack {
        // Might fail on some systems
        if let Err(e) = socket.set_only_v6(false) {
            tracing::warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                e
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    // Make it non-blocking for tokio
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

fn create_wildcard_listener(port: u16) -> std::io::Result<(String, TcpListener)> {
    let v6_addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    tracing::info!(
        "Attempting to bind server to {}... (IPv6 + IPv4 dual-stack)",
        v6_addr
    );
    match bind_socket(Domain::IPV6, v6_addr, true) {
        Ok(listener) => return Ok((v6_addr.to_string(), listener)),
        Err(e) => tracing::warn!("Failed to bind IPv6 listener: {}. Attempting IPv4 only.", e),
    }

    let v4_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    tracing::info!("Attempting to bind server to {}... (IPv4)", v4_addr);
    let listener = bind_socket(Domain::IPV4, v4_addr, false)?;

    Ok((v4_addr.to_string(), listener))
}
