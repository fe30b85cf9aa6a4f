use async_trait::async_trait;
use friday_rs_exec::{CommandResult, CommandRunner, CommandSpec, ExecError};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;

/// Scripted outcome for the next `run` call.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    Completed(CommandResult),
    TimedOut,
    NotFound,
}

impl ScriptedRun {
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self::Completed(CommandResult {
            status_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self::Completed(CommandResult {
            status_code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        })
    }
}

/// Runner that records every spec and replays scripted outcomes.
///
/// Unscripted runs succeed with empty output. Every program is found on PATH
/// unless [`RecordingRunner::with_programs`] narrows the set.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    runs: Mutex<Vec<CommandSpec>>,
    spawns: Mutex<Vec<CommandSpec>>,
    scripted: Mutex<VecDeque<ScriptedRun>>,
    programs: Option<BTreeSet<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs = Some(programs.into_iter().map(Into::into).collect());
        self
    }

    pub fn script(&self, outcome: ScriptedRun) {
        self.scripted.lock().push_back(outcome);
    }

    /// Command lines passed to `run`, in order.
    pub fn runs(&self) -> Vec<String> {
        self.runs.lock().iter().map(CommandSpec::display).collect()
    }

    /// Command lines passed to `spawn`, in order.
    pub fn spawns(&self) -> Vec<String> {
        self.spawns.lock().iter().map(CommandSpec::display).collect()
    }

    pub fn last_run(&self) -> Option<CommandSpec> {
        self.runs.lock().last().cloned()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandResult, ExecError> {
        let command = spec.display();
        let after = spec.timeout.unwrap_or(Duration::ZERO);
        let program = spec.command.display().to_string();
        self.runs.lock().push(spec);
        match self.scripted.lock().pop_front() {
            None => Ok(CommandResult {
                status_code: Some(0),
                ..CommandResult::default()
            }),
            Some(ScriptedRun::Completed(result)) => Ok(result),
            Some(ScriptedRun::TimedOut) => Err(ExecError::TimedOut { command, after }),
            Some(ScriptedRun::NotFound) => Err(ExecError::NotFound(program)),
        }
    }

    async fn spawn(&self, spec: CommandSpec) -> Result<u32, ExecError> {
        self.spawns.lock().push(spec);
        Ok(4242)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        match &self.programs {
            Some(programs) if !programs.contains(program) => None,
            _ => Some(PathBuf::from("/usr/bin").join(program)),
        }
    }
}
