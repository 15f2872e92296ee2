mod cli;
mod config;
mod render;
mod shell;

use std::process::ExitCode;

use clap::Parser;
use dayplan_core::{DayplanError, ErrorKind, NewTask, SystemClock, TaskViewModel};

use crate::cli::{AddArgs, Cli, Commands};
use crate::config::Config;
use crate::shell::{Confirm, Prompter};

/// Build the repository input for an `add` from its flags.
pub(crate) fn new_task(args: AddArgs) -> NewTask {
    NewTask::new(args.text.join(" "), args.category, args.due, args.priority)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    config.init_tracing();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, message) = failure_status(&err);
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

/// Exit code and stderr line for a failed run: 2 for rejected input, 1 otherwise.
fn failure_status(err: &anyhow::Error) -> (u8, String) {
    match err.downcast_ref::<DayplanError>() {
        Some(e) if e.kind() == ErrorKind::Validation => (2, shell::describe_failure(e)),
        _ => (1, format!("error: {err:#}")),
    }
}

async fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let repository = config.open_repository()?;
    let mut vm = TaskViewModel::new(repository, SystemClock);
    vm.load().await?;

    let mut prompter = Prompter::stdin();
    match command {
        Commands::List { view, json } => {
            vm.set_query(view.into_query());
            if json {
                render::print_json(vm.view())?;
            } else {
                render::print_table(vm.view(), vm.query());
            }
            return Ok(());
        }
        Commands::Add(args) => {
            let id = vm.add_task(new_task(args)).await?;
            println!("Added task {id}.");
        }
        Commands::Toggle { id } => vm.toggle_task(id).await?,
        Commands::Rename { id, text } => vm.rename_task(id, &text.join(" ")).await?,
        Commands::Delete { id, yes } => {
            if !yes && !prompter.confirm("Are you sure you want to delete this task?").await? {
                println!("Nothing deleted.");
                return Ok(());
            }
            vm.delete_task(id).await?;
        }
        Commands::ClearCompleted { yes } => {
            if !yes && !prompter.confirm("Clear all completed tasks?").await? {
                println!("Nothing cleared.");
                return Ok(());
            }
            vm.clear_completed().await?;
        }
        Commands::Shell => return shell::run(&mut vm, &mut prompter).await,
    }

    render::print_table(vm.view(), vm.query());
    Ok(())
}
