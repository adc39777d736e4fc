//! Turns a command plus bound params into something that can run: a captured local
//! process, a terminal-attached local process, or an HTTP request.

use serde_json::{Map, Value};

use crate::error::RunError;
use crate::model::{Command, CommandParams, Extension, Origin};

mod local;
mod remote;
mod template;

pub use self::local::Invocation;
pub use self::remote::{QUERY_HEADER, RemoteRequest};

#[derive(Clone, Debug)]
pub enum Executable {
    /// Local process whose stdout is the command output.
    Captured(Invocation),
    /// Local process that takes over the terminal.
    Interactive(Invocation),
    Remote(RemoteRequest),
}

impl Executable {
    /// Runs to completion on the calling thread and returns the raw output.
    ///
    /// Interactive invocations inherit the caller's stdio and produce no output.
    pub fn execute(&self) -> Result<Vec<u8>, RunError> {
        match self {
            Executable::Captured(invocation) => invocation.output(),
            Executable::Interactive(invocation) => {
                let status = invocation.run_attached()?;
                if status.success() {
                    Ok(Vec::new())
                } else {
                    Err(RunError::Exit {
                        code: status.code().unwrap_or(-1),
                        stderr: String::new(),
                    })
                }
            }
            Executable::Remote(request) => request.send(),
        }
    }
}

/// Fails with the first required variable of the command or extension that is unset.
pub fn check_env(extension: &Extension, command: &Command) -> Result<(), RunError> {
    for name in command.env.iter().chain(extension.manifest.env.iter()) {
        if std::env::var_os(name).is_none() {
            return Err(RunError::MissingEnv(name.clone()));
        }
    }
    Ok(())
}

/// Fails with the first required param that has no value in `params`.
pub fn check_params(command: &Command, params: &Map<String, Value>) -> Result<(), RunError> {
    for param in &command.params {
        if param.is_required() && !params.contains_key(&param.name) {
            return Err(RunError::MissingParam(param.name.clone()));
        }
    }
    Ok(())
}

/// Fills declared defaults for params the caller left unbound.
pub fn with_defaults(command: &Command, params: &Map<String, Value>) -> Map<String, Value> {
    let mut out = params.clone();
    for param in &command.params {
        if let Some(default) = &param.default
            && !out.contains_key(&param.name)
        {
            out.insert(param.name.clone(), default.clone());
        }
    }
    out
}

/// Builds the executable unit for one run of `command`.
///
/// Every pre-flight check happens here, so a returned [`Executable`] never fails for a
/// missing parameter or variable, and a remote interactive command never reaches the
/// network.
pub fn resolve(
    extension: &Extension,
    command: &Command,
    params: &Map<String, Value>,
    query: &str,
) -> Result<Executable, RunError> {
    check_env(extension, command)?;
    check_params(command, params)?;
    let with = with_defaults(command, params);

    match &extension.origin {
        Origin::Remote(base_url) => {
            if command.interactive {
                return Err(RunError::InteractiveRemote);
            }
            Ok(Executable::Remote(RemoteRequest::new(
                base_url,
                &command.name,
                CommandParams { with, query: None },
                query,
            )))
        }
        Origin::Local(root) => {
            let exec = command
                .exec
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| RunError::MissingExec(command.name.clone()))?;
            let line = template::render(exec, &with, query)?;
            let payload = CommandParams {
                with,
                query: (!query.is_empty()).then(|| query.to_string()),
            };
            let invocation = Invocation::shell(line, root.clone(), &payload)?;
            if command.interactive {
                Ok(Executable::Interactive(invocation))
            } else {
                Ok(Executable::Captured(invocation))
            }
        }
    }
}
