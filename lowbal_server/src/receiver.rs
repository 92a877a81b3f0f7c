use crossbeam_channel::{Sender, bounded};
use log::{debug, error, info, warn};
use lowbal_common::command::{read_line, write_line};
use lowbal_common::{LowbalError, Request, Response};
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

/// A request travelling to the main loop together with the channel for its reply.
pub type Envelope = (Request, Sender<Response>);

/// TCP command receiver that accepts client requests.
///
/// Each accepted connection is served on its own short-lived thread: one JSON
/// `Request` line is decoded, forwarded to the main loop, and the `Response`
/// it produces is written back. A failing connection is logged and dropped
/// without affecting the accept loop.
pub struct CommandReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl CommandReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `127.0.0.1:7878`).
    pub fn new(bind_addr: &str) -> Result<Self, LowbalError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the receiver is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, LowbalError> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that accepts TCP connections and forwards one request per
    /// connection to `tx`.
    pub(crate) fn receive_loop_with_channel(self, tx: Sender<Envelope>) -> Result<(), LowbalError> {
        info!("Command TCP server is started on {}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let peer = stream.peer_addr().ok();
                        if let Err(e) = serve_connection(stream, &tx) {
                            warn!("Connection {:?} failed: {}", peer, e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Reads one request from `stream`, waits for the main loop's reply and writes it back.
fn serve_connection(stream: TcpStream, tx: &Sender<Envelope>) -> Result<(), LowbalError> {
    debug!("client_tcp_addr: {:?}", stream.peer_addr()?);
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    let request: Request = match read_line(&mut reader) {
        Ok(request) => request,
        Err(e) => {
            write_line(&mut writer, &Response::from(e))?;
            return Ok(());
        }
    };
    info!("Received command {:?}", request);

    let (reply_tx, reply_rx) = bounded::<Response>(1);
    tx.send((request, reply_tx))
        .map_err(|e| LowbalError::ChannelSend(e.to_string()))?;
    let response = reply_rx
        .recv()
        .map_err(|e| LowbalError::ChannelRecv(e.to_string()))?;

    write_line(&mut writer, &response)
}
