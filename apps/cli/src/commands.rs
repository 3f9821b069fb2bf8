//! Command definitions and their execution.

use std::io::Write;

use clap::{Parser, Subcommand};
use entities::{List, Task};
use todo_store::Storage;

/// Keep track of tasks organized into lists.
#[derive(Debug, Parser)]
#[command(name = "todo", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show all lists, oldest first
    Lists,
    /// Create a list
    AddList { name: String },
    /// Rename a list
    RenameList { id: String, name: String },
    /// Delete a list and its tasks
    RmList { id: String },
    /// Delete the tasks of every list
    Clear,
    /// Show the tasks of a list, oldest first
    Tasks { list_id: String },
    /// Add a task to a list
    AddTask { list_id: String, text: String },
    /// Change a task's text
    EditTask { id: String, text: String },
    /// Toggle a task between open and done
    Toggle { id: String },
    /// Delete a task
    RmTask { id: String },
}

impl Command {
    /// Runs the command against `storage`, printing results to `out`.
    pub async fn run(self, storage: &Storage, out: &mut impl Write) -> anyhow::Result<()> {
        match self {
            Command::Lists => {
                for list in storage.get_lists().await? {
                    writeln!(out, "{}  {}", list.id, list.name)?;
                }
            }
            Command::AddList { name } => {
                let list = storage.store_list(List::new(name)).await?;
                writeln!(out, "{}", list.id)?;
            }
            Command::RenameList { id, name } => {
                let mut list = storage.get_list(&id).await?;
                list.name = name;
                storage.update_list(list).await?;
            }
            Command::RmList { id } => storage.delete_list(&id).await?,
            Command::Clear => storage.delete_lists().await?,
            Command::Tasks { list_id } => {
                storage.get_list(&list_id).await?;
                for task in storage.get_tasks(&list_id).await? {
                    writeln!(out, "{}", format_task(&task))?;
                }
            }
            Command::AddTask { list_id, text } => {
                storage.get_list(&list_id).await?;
                let task = storage.store_task(Task::new(list_id, text)).await?;
                writeln!(out, "{}", task.id)?;
            }
            Command::EditTask { id, text } => {
                let mut task = storage.get_task(&id).await?;
                task.text = text;
                storage.update_task(task).await?;
            }
            Command::Toggle { id } => {
                let task = storage.toggle_task(&id).await?;
                writeln!(out, "{}", format_task(&task))?;
            }
            Command::RmTask { id } => storage.delete_task(&id).await?,
        }

        Ok(())
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  {}", task.id, task.text)
}
