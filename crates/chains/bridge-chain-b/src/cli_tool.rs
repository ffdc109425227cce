//! Subprocess adapter around the chain-B CLI binary.
//!
//! Chain B's signing, multisig assembly, and broadcast logic lives in an
//! external binary (the chain's own CLI tool), not in-process. This module
//! wraps it the way an integration harness wraps a node daemon: spawn,
//! capture stdout/stderr, and enforce a timeout.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::ChainBConfig;

#[derive(Debug, thiserror::Error)]
pub enum CliToolError {
    #[error("failed to spawn cli tool: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("cli tool timed out after {0:?}")]
    Timeout(Duration),
    #[error("cli tool exited with status {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },
    #[error("failed to write to cli tool stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

impl CliToolError {
    /// The subprocess is treated as flaky as any other network-adjacent
    /// dependency: a timeout and a non-zero exit are both assumed transient,
    /// never a permanent failure on their own. Only a failure to even launch
    /// or talk to it is not worth retrying.
    pub fn is_retriable(&self) -> bool {
        matches!(self, CliToolError::Timeout(_) | CliToolError::NonZeroExit { .. })
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_retriable()
    }
}

/// Adapter around the chain-B CLI binary's `sign` and `execute` subcommands,
/// grounded on the original bridge's temp-file-and-subprocess invocation
/// style but piping payloads over stdin instead of temp files. Chain A's
/// release broadcast goes through `submit_release` instead of an assembled
/// multisig transaction — see `leader_b`'s own-key design.
#[derive(Debug, Clone)]
pub struct CliTool {
    binary_path: PathBuf,
    signer_account: String,
    timeout: Duration,
}

impl CliTool {
    pub fn new(config: &ChainBConfig) -> Self {
        Self {
            binary_path: config.cli_path.clone(),
            signer_account: config.signer_account.clone(),
            timeout: Duration::from_secs(config.cli_timeout_secs),
        }
    }

    /// Sign an unsigned transaction payload with this process's account key,
    /// returning the signed payload as produced on the CLI tool's stdout.
    pub async fn sign(&self, unsigned_tx: &[u8]) -> Result<Vec<u8>, CliToolError> {
        self.run(&["sign", "--from", &self.signer_account], unsigned_tx)
            .await
    }

    /// Builds, signs, and broadcasts a mint execution in one CLI invocation,
    /// the B-side counterpart of an A→B lock once the leader has observed
    /// on-chain confirmation quorum. Chain B has no notion of a partially
    /// built, not-yet-signed mint call worth round-tripping through this
    /// process, so unlike `sign` this is a single subcommand rather than a
    /// separate build-then-submit pipeline.
    pub async fn execute_mint(
        &self,
        nonce: u64,
        destination: &str,
        amount: u128,
        token: &str,
    ) -> Result<Vec<u8>, CliToolError> {
        let payload = serde_json::json!({
            "nonce": nonce,
            "destination": destination,
            "amount": amount.to_string(),
            "token": token,
        });
        self.run(
            &["execute", "--from", &self.signer_account],
            payload.to_string().as_bytes(),
        )
        .await
    }

    async fn run(&self, args: &[&str], stdin_payload: &[u8]) -> Result<Vec<u8>, CliToolError> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(CliToolError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_payload)
                .await
                .map_err(CliToolError::Stdin)?;
        }

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CliToolError::Timeout(self.timeout))?
            .map_err(CliToolError::Spawn)?;

        if !output.status.success() {
            return Err(CliToolError::NonZeroExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exercises `run`'s subprocess plumbing (stdin piping, exit status,
    /// timeout) against `/bin/sh -c <script>` in place of a real chain-B
    /// binary. `sign`/`execute_mint` are thin argument builders over the
    /// same `run`, so this covers their shared behavior without needing a
    /// fake chain-B binary on disk.
    fn sh_tool(timeout: Duration) -> CliTool {
        CliTool {
            binary_path: PathBuf::from("/bin/sh"),
            signer_account: "alice".to_string(),
            timeout,
        }
    }

    #[tokio::test]
    async fn echoes_stdin_on_success() {
        let tool = sh_tool(Duration::from_secs(5));
        let out = tool.run(&["-c", "cat"], b"hello").await.unwrap();
        assert_eq!(out, b"hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let tool = sh_tool(Duration::from_secs(5));
        let err = tool.run(&["-c", "exit 1"], b"").await.unwrap_err();
        assert!(matches!(err, CliToolError::NonZeroExit { .. }));
        assert!(err.is_retriable());
    }

    #[tokio::test]
    async fn hang_past_timeout_is_retriable() {
        let tool = sh_tool(Duration::from_millis(50));
        let err = tool.run(&["-c", "sleep 5"], b"").await.unwrap_err();
        assert!(matches!(err, CliToolError::Timeout(_)));
        assert!(err.is_retriable());
    }
}
