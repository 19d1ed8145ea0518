//! Client module for bngblaster-cli.
//!
//! One invocation is a straight line:
//! - Build the request from the command line
//! - Send it over the control socket and read until the server closes
//! - Pretty-print the JSON response

pub mod output;
pub mod request;
pub mod socket;

pub use output::render_response;
pub use request::{build_request, Invocation};
pub use socket::send_request;

use crate::error::CliError;
use crate::protocol::encode_request;
use std::time::Duration;
use tracing::debug;

/// Settings that shape a single exchange.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeOptions {
    /// Give up when the response is not complete after this long.
    pub timeout: Option<Duration>,
    /// Indentation width of the rendered response.
    pub indent: usize,
}

/// Send the invocation's request and return the rendered response.
pub async fn execute(invocation: &Invocation, options: ExchangeOptions) -> Result<String, CliError> {
    let payload = encode_request(&invocation.request).map_err(std::io::Error::from)?;
    debug!("Sending command '{}'", invocation.request.command);

    let response = send_request(&invocation.socket_path, &payload, options.timeout).await?;
    render_response(&response, options.indent)
}
