use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::RunError;
use crate::model::CommandParams;

/// A local process launch: `sh -c <line>` in the extension root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub line: String,
    pub dir: PathBuf,
    /// JSON request envelope written to stdin of captured runs.
    pub stdin: Vec<u8>,
}

impl Invocation {
    pub(super) fn shell(
        line: String,
        dir: PathBuf,
        payload: &CommandParams,
    ) -> Result<Self, RunError> {
        let stdin = serde_json::to_vec(payload)
            .map_err(|err| RunError::transport("encode command params", err))?;
        Ok(Self { line, dir, stdin })
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.line).current_dir(&self.dir);
        cmd
    }

    /// Runs with captured stdio and returns stdout.
    pub fn output(&self) -> Result<Vec<u8>, RunError> {
        debug!(line = %self.line, dir = %self.dir.display(), "spawn command");
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| RunError::transport("spawn command", err))?;

        // Feed stdin from its own thread so a child that writes before it reads
        // cannot deadlock against us on full pipes.
        let writer = child.stdin.take().map(|mut stdin| {
            let payload = self.stdin.clone();
            std::thread::spawn(move || match stdin.write_all(&payload) {
                Err(err) if err.kind() != ErrorKind::BrokenPipe => Err(err),
                _ => Ok(()),
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|err| RunError::transport("wait for command", err))?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(RunError::transport("write command input", err)),
                Err(_) => {
                    return Err(RunError::transport(
                        "write command input",
                        "input writer panicked",
                    ));
                }
            }
        }
        if !output.status.success() {
            return Err(RunError::Exit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }

    /// Runs attached to the controlling terminal and waits for it to exit.
    pub fn run_attached(&self) -> Result<ExitStatus, RunError> {
        debug!(line = %self.line, dir = %self.dir.display(), "run attached command");
        self.command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|err| RunError::transport("run command", err))
    }
}
