//! Sending requests to the negotiation server over TCP.
//!
//! Each request opens a fresh connection, writes one JSON line and waits for
//! the single JSON line the server answers with.
use log::{debug, info};
use lowbal_common::command::{read_line, write_line};
use lowbal_common::{LowbalError, Request, Response};
use std::io::BufReader;
use std::net::TcpStream;
use std::time::Duration;

/// How long to wait for a reply. Offer generation includes a simulated delay of a few seconds.
const READ_TIMEOUT_SECS: u64 = 30;

/// Helper type for sending requests to the server.
pub struct CommandSender;

impl CommandSender {
    /// Sends `request` to `server_address` and returns the server's response.
    pub fn send_request(server_address: &str, request: &Request) -> Result<Response, LowbalError> {
        info!("Connecting to TCP server at {}", server_address);
        let mut stream = TcpStream::connect(server_address)
            .map_err(|e| LowbalError::Format(format!("Failed to connect to server: {}", e)))?;
        stream.set_read_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)))?;

        debug!("Sending request: {:?}", request);
        write_line(&mut stream, request)?;
        read_line(&mut BufReader::new(stream))
    }
}
