use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use todolist::{Counts, Severity, TaskFilter, TaskStore};

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Todolist - a persistent task list for the console")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: platform data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the task list under a view filter
    List {
        /// View filter: all, active or completed
        filter: Option<TaskFilter>,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id
        id: u64,
    },

    /// Replace a task's text
    Edit {
        /// Task id
        id: u64,
        /// Replacement text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Delete a task
    Remove {
        /// Task id
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every completed task
    ClearCompleted {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show per-filter task totals
    Counts,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store_path = cli.store_path.unwrap_or_else(default_store_path);
    let mut store = TaskStore::open(&store_path)
        .with_context(|| format!("Failed to open task store at {}", store_path.display()))?;

    match cli.command {
        Commands::Add { text } => match store.add(&text.join(" ")) {
            Ok(task) => {
                notify(&format!("Task added: {}", task.text), Severity::Success);
                render(&store);
            }
            Err(e) => notify(&e.to_string(), e.severity()),
        },

        Commands::List { filter } => {
            if let Some(filter) = filter {
                store.set_filter(filter);
            }
            render(&store);
        }

        Commands::Toggle { id } => match store.toggle(id) {
            Ok(Some(true)) => {
                notify("Task completed", Severity::Success);
                render(&store);
            }
            Ok(Some(false)) => {
                notify("Task reopened", Severity::Success);
                render(&store);
            }
            Ok(None) => notify(&format!("No task with id {id}, nothing to do"), Severity::Info),
            Err(e) => notify(&e.to_string(), e.severity()),
        },

        Commands::Edit { id, text } => {
            if let Err(e) = store.begin_edit(id) {
                notify(&e.to_string(), e.severity());
            } else {
                match store.commit_edit(&text.join(" ")) {
                    Ok(Some(task)) => {
                        notify(&format!("Task updated: {}", task.text), Severity::Success);
                        render(&store);
                    }
                    Ok(None) => notify("Nothing to update", Severity::Info),
                    Err(e) => notify(&e.to_string(), e.severity()),
                }
            }
        }

        Commands::Remove { id, yes } => {
            if !yes && !confirm(&format!("Delete task {id}?"))? {
                notify("Removal cancelled", Severity::Info);
            } else {
                match store.remove(id) {
                    Ok(true) => {
                        notify("Task removed", Severity::Success);
                        render(&store);
                    }
                    Ok(false) => {
                        notify(&format!("No task with id {id}, nothing to do"), Severity::Info)
                    }
                    Err(e) => notify(&e.to_string(), e.severity()),
                }
            }
        }

        Commands::ClearCompleted { yes } => {
            let completed = store.counts().completed;
            if completed == 0 {
                notify("No completed tasks to clear", Severity::Info);
            } else if !yes && !confirm(&format!("Clear {completed} completed task(s)?"))? {
                notify("Clear cancelled", Severity::Info);
            } else {
                match store.clear_completed() {
                    Ok(removed) => {
                        notify(&format!("Cleared {removed} completed task(s)"), Severity::Success);
                        render(&store);
                    }
                    Err(e) => notify(&e.to_string(), e.severity()),
                }
            }
        }

        Commands::Counts => {
            let Counts { all, active, completed } = store.counts();
            println!("{all} total, {active} active, {completed} completed");
        }
    }

    Ok(())
}

/// Redraw the list under the active filter, then the counters
fn render(store: &TaskStore) {
    println!();

    let mut shown = 0;
    for task in store.filtered() {
        shown += 1;
        let mark = if task.completed { "[x]".green() } else { "[ ]".normal() };
        let text = if task.completed {
            task.text.dimmed().strikethrough()
        } else {
            task.text.normal()
        };
        println!("  {} {:>4}  {}", mark, task.id, text);
    }

    if shown == 0 {
        println!("  {}", empty_state_message(store.current_filter()).dimmed());
    }

    let Counts { all, active, completed } = store.counts();
    println!("  {}", format!("{all} total | {active} active | {completed} completed").dimmed());
}

fn empty_state_message(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::Active => "No active tasks",
        TaskFilter::Completed => "No completed tasks",
        TaskFilter::All => "No tasks yet, add one to get started",
    }
}

/// One `(message, severity)` line per operation
fn notify(message: &str, severity: Severity) {
    let line = match severity {
        Severity::Success => message.green(),
        Severity::Info => message.blue(),
        Severity::Warning => message.yellow(),
        Severity::Error => message.red().bold(),
    };
    println!("{line}");
}

/// Ask before a destructive operation; the store itself never prompts
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("todolist"))
        .unwrap_or_else(|| PathBuf::from("."))
}
