//! Turns command-line tokens into a control socket request.

use crate::error::CliError;
use crate::protocol::{ArgValue, Arguments, Request};
use std::path::PathBuf;

/// Where to send what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Control socket of the running server.
    pub socket_path: PathBuf,
    /// The request to send.
    pub request: Request,
}

/// Build an invocation from `<socket> <command> [<key> <value> ...]`.
///
/// Values are sent as integers when they parse as one. A key without a value
/// is rejected rather than dropped.
pub fn build_request<S: AsRef<str>>(tokens: &[S]) -> Result<Invocation, CliError> {
    let [socket, command, pairs @ ..] = tokens else {
        return Err(CliError::Usage);
    };

    let mut arguments = Arguments::new();
    let mut chunks = pairs.chunks_exact(2);
    for pair in &mut chunks {
        arguments.insert(pair[0].as_ref(), ArgValue::coerce(pair[1].as_ref()));
    }
    if let [key] = chunks.remainder() {
        return Err(CliError::MissingValue {
            key: key.as_ref().to_string(),
        });
    }

    let mut request = Request::new(command.as_ref());
    if !arguments.is_empty() {
        request.arguments = Some(arguments);
    }

    Ok(Invocation {
        socket_path: PathBuf::from(socket.as_ref()),
        request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_tokens() {
        let none: [&str; 0] = [];
        assert!(matches!(build_request(&none), Err(CliError::Usage)));
        assert!(matches!(build_request(&["run.sock"]), Err(CliError::Usage)));
    }

    #[test]
    fn test_command_only() {
        let inv = build_request(&["run.sock", "session-counters"]).unwrap();
        assert_eq!(inv.socket_path, PathBuf::from("run.sock"));
        assert_eq!(inv.request, Request::new("session-counters"));
        assert!(inv.request.arguments.is_none());
    }

    #[test]
    fn test_arguments_keep_order_and_coerce() {
        let inv = build_request(&[
            "run.sock",
            "igmp-join",
            "outer-vlan",
            "1",
            "inner-vlan",
            "-2",
            "group",
            "239.0.0.1",
            "source1",
            "1.1.1.1",
        ])
        .unwrap();
        let args = inv.request.arguments.unwrap();
        let collected: Vec<_> = args.iter().collect();
        assert_eq!(
            collected,
            [
                ("outer-vlan", &ArgValue::Integer(1)),
                ("inner-vlan", &ArgValue::Integer(-2)),
                ("group", &ArgValue::Text("239.0.0.1".into())),
                ("source1", &ArgValue::Text("1.1.1.1".into())),
            ]
        );
    }

    #[test]
    fn test_unpaired_key_is_rejected() {
        let err = build_request(&["run.sock", "session-info", "outer-vlan"]).unwrap_err();
        assert!(matches!(err, CliError::MissingValue { ref key } if key == "outer-vlan"));

        let err = build_request(&["run.sock", "session-info", "outer-vlan", "1", "inner-vlan"])
            .unwrap_err();
        assert!(matches!(err, CliError::MissingValue { ref key } if key == "inner-vlan"));
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tokens = vec!["/tmp/test.sock".to_string(), "terminate".to_string()];
        let inv = build_request(&tokens).unwrap();
        assert_eq!(inv.request.command, "terminate");
    }
}
