// src/exec/command.rs

use std::io::{self, PipeReader, Read};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Why an action did not succeed.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{status}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        output: Vec<u8>,
    },
}

impl ActionError {
    pub fn command(&self) -> &str {
        match self {
            ActionError::Spawn { command, .. }
            | ActionError::Io { command, .. }
            | ActionError::ExitStatus { command, .. } => command,
        }
    }
}

/// Run `command` to completion and return its combined output.
///
/// The command is executed directly: no shell, no arguments. It inherits the
/// working directory and environment of this process. stdout and stderr share
/// one pipe, so the output keeps the order the child wrote it in. There is no
/// timeout.
pub async fn run_action(command: &str) -> Result<Vec<u8>, ActionError> {
    info!(cmd = %command, "starting action");

    let io_err = |source: io::Error| ActionError::Io {
        command: command.to_string(),
        source,
    };

    let (reader, writer) = io::pipe().map_err(io_err)?;
    let stderr_writer = writer.try_clone().map_err(io_err)?;

    let mut cmd = Command::new(command);
    cmd.stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer);
    let spawned = cmd.spawn();
    // `cmd` still holds our copies of the write end; the reader only sees EOF
    // once they are closed.
    drop(cmd);

    let mut child = spawned.map_err(|source| ActionError::Spawn {
        command: command.to_string(),
        source,
    })?;

    let combined = collect_combined(reader).await.map_err(io_err)?;
    let status = child.wait().await.map_err(io_err)?;

    debug!(
        cmd = %command,
        exit_code = ?status.code(),
        bytes = combined.len(),
        "action exited"
    );

    if status.success() {
        Ok(combined)
    } else {
        Err(ActionError::ExitStatus {
            command: command.to_string(),
            status,
            output: combined,
        })
    }
}

/// Read the shared output pipe to EOF on the blocking pool.
async fn collect_combined(mut reader: PipeReader) -> io::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || -> io::Result<Vec<u8>> {
        let mut combined = Vec::new();
        reader.read_to_end(&mut combined)?;
        Ok(combined)
    })
    .await
    .map_err(io::Error::other)?
}
