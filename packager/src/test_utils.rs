//! Shared test utilities for the packager crate.
//!
//! Compiled for unit tests and, through the `test-support` feature, for the
//! integration tests under `tests/`.

use crate::builder::{CompileRequest, Compiler};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(u32::try_from(code).unwrap_or(1))
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(101),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// What the stub compiler does for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubStep {
    /// Exit zero and write a placeholder binary where the request expects it.
    Succeed,
    /// Exit zero without writing anything.
    SucceedWithoutBinary,
    /// Exit non-zero with the given stderr.
    Fail(String),
}

/// A scripted [`Compiler`] for tests.
///
/// Each call consumes the next [`StubStep`]. Calls beyond the script fail to
/// launch, which surfaces as a compiler launch error. Every request is
/// recorded so tests can assert on the order of targets.
#[derive(Debug, Default)]
pub struct StubCompiler {
    steps: RefCell<VecDeque<StubStep>>,
    calls: RefCell<Vec<CompileRequest>>,
}

impl StubCompiler {
    /// Creates a stub that plays `steps` in order.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = StubStep>) -> Self {
        Self {
            steps: RefCell::new(steps.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CompileRequest> {
        self.calls.borrow().clone()
    }

    /// Number of scripted steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.borrow().len()
    }
}

impl Compiler for StubCompiler {
    fn compile(&self, request: &CompileRequest) -> std::io::Result<Output> {
        self.calls.borrow_mut().push(request.clone());
        let step = self.steps.borrow_mut().pop_front();

        match step {
            Some(StubStep::Succeed) => {
                write_placeholder_binary(request)?;
                Ok(success_output())
            }
            Some(StubStep::SucceedWithoutBinary) => Ok(success_output()),
            Some(StubStep::Fail(stderr)) => Ok(failure_output(&stderr)),
            None => Err(std::io::Error::other(format!(
                "unexpected compiler invocation for {}",
                request.target_label()
            ))),
        }
    }
}

fn write_placeholder_binary(request: &CompileRequest) -> std::io::Result<()> {
    let path = request.expected_binary();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, format!("easyjs binary for {}\n", request.target_label()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
