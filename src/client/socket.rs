//! Unix socket transport for the control socket.

use crate::error::CliError;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, trace};

/// Send `payload` to the socket at `socket_path` and return everything the
/// peer writes before closing the connection.
///
/// Without a timeout this waits as long as the peer keeps the connection open.
pub async fn send_request(
    socket_path: &Path,
    payload: &[u8],
    timeout: Option<Duration>,
) -> Result<String, CliError> {
    if !socket_path.exists() {
        return Err(CliError::SocketNotFound {
            path: socket_path.to_path_buf(),
        });
    }

    match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange(socket_path, payload))
            .await
            .map_err(|_| CliError::Timeout {
                path: socket_path.to_path_buf(),
                limit,
            })?,
        None => exchange(socket_path, payload).await,
    }
}

/// One connection, one write, read to EOF. The stream is dropped on return.
async fn exchange(socket_path: &Path, payload: &[u8]) -> Result<String, CliError> {
    debug!("Connecting to {}", socket_path.display());
    let mut stream = UnixStream::connect(socket_path).await?;

    trace!("Request: {}", String::from_utf8_lossy(payload));
    stream.write_all(payload).await?;
    debug!("Sent {} bytes", payload.len());

    let mut buf = Vec::with_capacity(1024);
    stream.read_to_end(&mut buf).await?;
    debug!("Received {} bytes", buf.len());

    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
