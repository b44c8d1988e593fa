use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::process::{ExitReport, ProcessHandle, Spawner};
use crate::selection::Selection;
use crate::utils;
use crate::workload::{Workload, WorkloadCommand};

/// How long a wait blocks on the interrupt channel between exit checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How the wait phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every child exited on its own.
    Completed,
    /// An interrupt arrived and every child was asked to terminate.
    Interrupted,
}

/// Commands for both workloads of a project.
#[derive(Debug, Clone)]
pub struct Launcher {
    backend: WorkloadCommand,
    frontend: WorkloadCommand,
}

impl Launcher {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            backend: WorkloadCommand::default_for(Workload::Backend, project_dir),
            frontend: WorkloadCommand::default_for(Workload::Frontend, project_dir),
        }
    }

    pub fn with_command(mut self, workload: Workload, command: WorkloadCommand) -> Self {
        match workload {
            Workload::Backend => self.backend = command,
            Workload::Frontend => self.frontend = command,
        }
        self
    }

    pub fn command(&self, workload: Workload) -> &WorkloadCommand {
        match workload {
            Workload::Backend => &self.backend,
            Workload::Frontend => &self.frontend,
        }
    }

    /// Start every selected workload, backend first.
    ///
    /// A spawn error is returned as-is. Workloads started before the failing
    /// one keep running and are not cleaned up.
    pub fn spawn<S: Spawner>(
        &self,
        selection: Selection,
        spawner: &mut S,
    ) -> Result<ProcessSet<S::Process>> {
        let mut set = ProcessSet::default();
        for workload in selection.workloads() {
            let command = self.command(workload);
            let process = spawner.spawn(workload, command)?;
            utils::status(
                workload.tag(),
                format!(
                    "started `{}` in {} (pid {})",
                    command.command_line(),
                    command.dir.display(),
                    process.id()
                ),
            );
            set.entries.push((workload, process));
        }
        Ok(set)
    }
}

/// Spawned children in spawn order.
pub struct ProcessSet<P> {
    entries: Vec<(Workload, P)>,
}

impl<P> Default for ProcessSet<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P: ProcessHandle> ProcessSet<P> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn workloads(&self) -> Vec<Workload> {
        self.entries.iter().map(|(w, _)| *w).collect()
    }

    /// Wait for each child in turn until it exits.
    ///
    /// If `interrupt` fires while waiting, every child (exited or not) gets a
    /// termination request and this returns without waiting again.
    pub fn wait(mut self, interrupt: &Receiver<()>) -> Result<Outcome> {
        for i in 0..self.entries.len() {
            let (workload, process) = &mut self.entries[i];
            let workload = *workload;
            match wait_one(process, interrupt)? {
                Some(exit) => report_exit(workload, exit),
                None => {
                    utils::status("devrun  ".red().bold(), "Stopping...");
                    self.terminate_all();
                    return Ok(Outcome::Interrupted);
                }
            }
        }
        Ok(Outcome::Completed)
    }

    fn terminate_all(&mut self) {
        for (workload, process) in self.entries.iter_mut() {
            if let Err(e) = process.terminate() {
                utils::warn(workload.tag(), format!("{:#}", e));
            }
        }
    }
}

/// Block until `process` exits (`Some`) or an interrupt arrives (`None`).
fn wait_one<P: ProcessHandle>(
    process: &mut P,
    interrupt: &Receiver<()>,
) -> Result<Option<ExitReport>> {
    loop {
        if let Some(exit) = process.try_wait()? {
            return Ok(Some(exit));
        }
        match interrupt.recv_timeout(POLL_INTERVAL) {
            Ok(()) => return Ok(None),
            Err(RecvTimeoutError::Timeout) => {}
            // No sender left, so no interrupt can arrive.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(POLL_INTERVAL),
        }
    }
}

fn report_exit(workload: Workload, exit: ExitReport) {
    let message = format!("exited ({})", exit);
    if exit.success() {
        utils::status(workload.tag(), message.green());
    } else {
        utils::status(workload.tag(), message.red());
    }
}

/// Spawn the selected workloads and wait for them.
pub fn run<S: Spawner>(
    launcher: &Launcher,
    selection: Selection,
    spawner: &mut S,
    interrupt: &Receiver<()>,
) -> Result<Outcome> {
    let names: Vec<&str> = selection.workloads().iter().map(|w| w.name()).collect();
    println!(
        "{}",
        format!("Starting development servers: {}", names.join(", ")).bold()
    );

    let set = launcher.spawn(selection, spawner)?;
    set.wait(interrupt)
}
