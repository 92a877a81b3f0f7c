//! Shared networking constants and helpers used by client and server.

/// Default TCP port for the command channel (client -> server).
pub const COMMAND_PORT: u16 = 7878;
/// Default address the server binds and the client connects to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
