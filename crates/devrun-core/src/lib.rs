//! Launch a project's backend and frontend development servers side by side.
//!
//! The CLI resolves a [`Selection`], builds a [`Launcher`] for the project
//! directory and hands both to [`launcher::run`] together with a spawner and
//! an interrupt channel.

pub mod launcher;
pub mod process;
pub mod selection;
pub mod utils;
pub mod workload;

pub use launcher::{Launcher, Outcome, ProcessSet};
pub use process::{ExitReport, ProcessHandle, Shell, Spawner, SystemProcess, SystemSpawner};
pub use selection::Selection;
pub use workload::{Workload, WorkloadCommand};
