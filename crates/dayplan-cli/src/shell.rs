//! Interactive session: one view-model, many intents.
//!
//! Search/filter/sort selections stay on the view-model between lines, the
//! way they stay on the page in a browser session.

use std::io::Write;

use async_trait::async_trait;
use clap::Parser;
use dayplan_core::{Clock, DayplanError, ErrorKind, TaskRepository, TaskViewModel};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::cli::ShellCommand;
use crate::render;

/// Yes/no answers for destructive intents.
#[async_trait]
pub trait Confirm: Send {
    /// Ask `question`; no answer means no.
    async fn confirm(&mut self, question: &str) -> anyhow::Result<bool>;
}

/// Line-oriented stdin reader shared by the shell loop and confirmations.
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt` and read one line; `None` on end of input.
    pub async fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

#[async_trait]
impl Confirm for Prompter {
    async fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.read_line(&format!("{question} [y/N] ")).await?;
        Ok(answer.is_some_and(|a| is_yes(&a)))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// What to tell the user about a failed intent.
pub fn describe_failure(err: &DayplanError) -> String {
    match err.kind() {
        ErrorKind::Validation => "Please enter a task!".to_string(),
        ErrorKind::Transport => format!("Could not reach the task store: {err}"),
    }
}

/// Result of one shell line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Nothing to show (blank line, declined confirmation).
    Idle,
    /// The view changed or was asked for.
    Render,
    /// The intent failed; the view-model is unchanged.
    Failed(String),
    /// Usage error or help text from clap.
    Usage(clap::Error),
    Quit,
}

pub async fn run<R, C>(vm: &mut TaskViewModel<R, C>, prompter: &mut Prompter) -> anyhow::Result<()>
where
    R: TaskRepository,
    C: Clock,
{
    println!("dayplan shell. Type `help` for commands, `quit` to leave.");
    render::print_table(vm.view(), vm.query());

    while let Some(line) = prompter.read_line("dayplan> ").await? {
        match handle_line(vm, prompter, &line).await? {
            LineOutcome::Idle => {}
            LineOutcome::Render => render::print_table(vm.view(), vm.query()),
            LineOutcome::Failed(message) => eprintln!("{message}"),
            LineOutcome::Usage(err) => {
                let _ = err.print();
            }
            LineOutcome::Quit => break,
        }
    }
    Ok(())
}

/// Parse and run one line.
///
/// Intent failures come back as `LineOutcome::Failed` so the session keeps
/// going. Anything else (stdin gone while confirming) is returned as `Err`.
pub async fn handle_line<R, C, P>(
    vm: &mut TaskViewModel<R, C>,
    confirm: &mut P,
    line: &str,
) -> anyhow::Result<LineOutcome>
where
    R: TaskRepository,
    C: Clock,
    P: Confirm + ?Sized,
{
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(LineOutcome::Idle);
    }

    let command = match ShellCommand::try_parse_from(words.iter().copied()) {
        Ok(command) => command,
        Err(err) => return Ok(LineOutcome::Usage(err)),
    };
    if matches!(command, ShellCommand::Quit) {
        return Ok(LineOutcome::Quit);
    }

    match execute(vm, confirm, command).await {
        Ok(true) => Ok(LineOutcome::Render),
        Ok(false) => Ok(LineOutcome::Idle),
        Err(err) => match err.downcast_ref::<DayplanError>() {
            Some(intent_err) => {
                tracing::warn!(error = %intent_err, "intent failed, view left unchanged");
                Ok(LineOutcome::Failed(describe_failure(intent_err)))
            }
            None => Err(err),
        },
    }
}

/// Run one shell command. Returns whether the view should be re-printed.
async fn execute<R, C, P>(
    vm: &mut TaskViewModel<R, C>,
    confirm: &mut P,
    command: ShellCommand,
) -> anyhow::Result<bool>
where
    R: TaskRepository,
    C: Clock,
    P: Confirm + ?Sized,
{
    match command {
        ShellCommand::List => vm.rederive(),
        ShellCommand::Add(args) => {
            let id = vm.add_task(crate::new_task(args)).await?;
            println!("Added task {id}.");
        }
        ShellCommand::Toggle { id } => vm.toggle_task(id).await?,
        ShellCommand::Rename { id, text } => vm.rename_task(id, &text.join(" ")).await?,
        ShellCommand::Delete { id } => {
            if !confirm.confirm("Are you sure you want to delete this task?").await? {
                return Ok(false);
            }
            vm.delete_task(id).await?;
        }
        ShellCommand::ClearCompleted => {
            if !confirm.confirm("Clear all completed tasks?").await? {
                return Ok(false);
            }
            vm.clear_completed().await?;
        }
        ShellCommand::Search { term } => vm.set_search_term(term.join(" ")),
        ShellCommand::Filter { mode } => vm.set_filter_mode(mode),
        ShellCommand::Sort { mode } => vm.set_sort_mode(mode),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}
