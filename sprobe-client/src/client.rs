//! # Synchronous Sentinel Client
//!
//! Purpose: Own one TCP connection to a sentinel (or any RESP2 server),
//! issue a command, and return the single decoded reply.
//!
//! ## Design Principles
//! 1. **Lazy Connection**: Nothing touches the network until `connect` or
//!    the first `execute`.
//! 2. **One Attempt**: Each resolved address is tried once; there is no
//!    retry loop at this layer.
//! 3. **Poisoned Streams Are Dropped**: After any I/O or framing failure the
//!    stream is closed, since its read position is unknown.
//! 4. **Typed Failures**: Connection, protocol, and server errors stay
//!    distinct so the caller can report them verbatim.

use std::io::{self, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::info::InfoFields;
use crate::resp::{encode_command, read_reply, Reply};

/// Default sentinel port.
pub const DEFAULT_PORT: u16 = 26379;

/// Default sentinel host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The peer could not be resolved, refused, or timed out.
    #[error("Error connecting to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// Transport failure on an established connection.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Reply framing could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(&'static str),
    /// The server answered with an error reply.
    #[error("{message}")]
    Server { message: String },
    /// The reply decoded fine but has the wrong type for the command.
    #[error("unexpected reply to {command}: got {found}")]
    UnexpectedResponse {
        command: &'static str,
        found: &'static str,
    },
}

/// Connection settings. Timeouts left as `None` use the OS defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or literal address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Optional per-address connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Optional socket read timeout.
    pub read_timeout: Option<Duration>,
    /// Optional socket write timeout.
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    /// `host:port` as used in diagnostics.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Blocking client holding at most one open connection.
pub struct SentinelClient {
    config: ClientConfig,
    conn: Option<Connection>,
}

struct Connection {
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: Vec<u8>,
}

impl SentinelClient {
    /// Creates an unconnected client.
    pub fn new(config: ClientConfig) -> Self {
        SentinelClient { config, conn: None }
    }

    /// True while a connection is open.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens the connection if it is not already open.
    pub fn connect(&mut self) -> ClientResult<()> {
        if self.conn.is_none() {
            self.conn = Some(Connection::open(&self.config)?);
        }
        Ok(())
    }

    /// Sends `command` with `args` and returns the decoded reply.
    ///
    /// A top-level error reply is returned as [`ClientError::Server`].
    pub fn execute<A: AsRef<[u8]>>(&mut self, command: &str, args: &[A]) -> ClientResult<Reply> {
        self.connect()?;
        let Some(conn) = self.conn.as_mut() else {
            return Err(ClientError::Protocol("connection unavailable"));
        };

        debug!(command, args = args.len(), "sending command");
        let reply = match conn.exchange(command, args) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(command, error = %err, "command failed, dropping connection");
                self.close();
                return Err(err);
            }
        };
        trace!(command, kind = reply.kind(), "reply decoded");

        match reply {
            Reply::Error(message) => Err(ClientError::Server {
                message: String::from_utf8_lossy(&message).into_owned(),
            }),
            other => Ok(other),
        }
    }

    /// Issues `INFO` and parses the report into key/value fields.
    pub fn info_fields(&mut self) -> ClientResult<InfoFields> {
        match self.execute::<&str>("INFO", &[])? {
            Reply::Bulk(Some(data)) => Ok(InfoFields::parse(&String::from_utf8_lossy(&data))),
            other => Err(ClientError::UnexpectedResponse {
                command: "INFO",
                found: other.kind(),
            }),
        }
    }

    /// Pings the server and returns the reply text.
    pub fn ping(&mut self) -> ClientResult<String> {
        match self.execute::<&str>("PING", &[])? {
            Reply::Simple(text) | Reply::Bulk(Some(text)) => {
                Ok(String::from_utf8_lossy(&text).into_owned())
            }
            other => Err(ClientError::UnexpectedResponse {
                command: "PING",
                found: other.kind(),
            }),
        }
    }

    /// Releases the connection. Safe to call repeatedly or before connecting.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            debug!(addr = %self.config.addr(), "closing connection");
            // Peer may already be gone; nothing useful to do with the error.
            let _ = conn.reader.get_ref().shutdown(Shutdown::Both);
        }
    }
}

impl Drop for SentinelClient {
    fn drop(&mut self) {
        self.close();
    }
}

impl Connection {
    fn open(config: &ClientConfig) -> ClientResult<Self> {
        let stream = connect_stream(config)?;
        let configure = |stream: &TcpStream| -> io::Result<()> {
            stream.set_read_timeout(config.read_timeout)?;
            stream.set_write_timeout(config.write_timeout)?;
            stream.set_nodelay(true)
        };
        configure(&stream).map_err(|source| ClientError::Connect {
            addr: config.addr(),
            source,
        })?;

        Ok(Connection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: Vec::with_capacity(64),
        })
    }

    fn exchange<A: AsRef<[u8]>>(&mut self, command: &str, args: &[A]) -> ClientResult<Reply> {
        self.write_buf.clear();
        let mut parts: Vec<&[u8]> = Vec::with_capacity(args.len() + 1);
        parts.push(command.as_bytes());
        parts.extend(args.iter().map(|arg| arg.as_ref()));
        encode_command(&parts, &mut self.write_buf);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buf)?;
        stream.flush()?;

        read_reply(&mut self.reader, &mut self.line_buf)
    }
}

fn connect_stream(config: &ClientConfig) -> ClientResult<TcpStream> {
    let connect_err = |source| ClientError::Connect {
        addr: config.addr(),
        source,
    };

    let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(connect_err)?
        .collect();

    let mut last_err = None;
    for addr in addrs {
        debug!(%addr, "connecting");
        let attempt = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                warn!(%addr, error = %err, "connect failed");
                last_err = Some(err);
            }
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}
