use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::mpsc;

use devrun_core::launcher::{self, Launcher, Outcome};
use devrun_core::{Selection, SystemSpawner};

use super::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let selection = Selection::resolve(cli.backend, cli.frontend);
    let launcher = Launcher::new(&cli.project_dir);

    // Installed before spawning so an early Ctrl-C is still forwarded.
    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .context("Failed to install Ctrl-C handler")?;

    let mut spawner = SystemSpawner::default();
    match launcher::run(&launcher, selection, &mut spawner, &rx)? {
        Outcome::Completed => println!("{}", "All development servers exited.".bold()),
        Outcome::Interrupted => println!("{}", "Stopped.".yellow().bold()),
    }

    Ok(())
}
