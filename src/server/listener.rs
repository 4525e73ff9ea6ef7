// Listener module
// Creates the TCP listener the wiki serves on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Pending connection queue length
const BACKLOG: i32 = 128;

/// Create a `TcpListener` with `SO_REUSEADDR` (and `SO_REUSEPORT` on Unix) enabled.
///
/// Lets a restarted server bind immediately while old sockets sit in `TIME_WAIT`.
///
/// # Arguments
///
/// * `addr` - The socket address to bind to
pub fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;

    // Required before handing the socket to tokio
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_binds_ephemeral_port() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let client = tokio::net::TcpStream::connect(addr).await;
        assert!(client.is_ok());
    }
}
