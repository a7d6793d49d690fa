mod list;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use todobase_core::config::data_dir;
use todobase_core::{
    BackendConfig, FilePreferenceStore, RestTaskRepository, Settings, TaskId, TaskList, TaskService,
    ThemeController,
};
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "todobase")]
#[command(about = "A to-do list backed by a hosted table API", long_about = None)]
struct Cli {
    /// Backend endpoint, e.g. https://<project>.supabase.co
    #[arg(long, env = "TODOBASE_URL", global = true)]
    url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[arg(long, env = "TODOBASE_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Table holding the tasks (default: TodoList)
    #[arg(long, env = "TODOBASE_TABLE", global = true)]
    table: Option<String>,

    /// Directory for config.json, preferences and logs (default: ~/.todobase)
    #[arg(long, env = "TODOBASE_HOME", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List all tasks
    List,
    /// Add a new task (usage: add Walk the dog)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Flip a task between done and not done
    Toggle { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
    /// Show or switch the light/dark theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(clap::Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
}

impl Cli {
    fn flag_settings(&self) -> Settings {
        Settings {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            table: self.table.clone(),
        }
    }
}

fn backend(cli: &Cli, dir: &std::path::Path) -> Result<TaskService<RestTaskRepository>> {
    let settings = Settings::load(dir)?.overlay(cli.flag_settings());
    let config = BackendConfig::from_settings(settings)?;
    tracing::debug!(url = %config.url, table = %config.table, "backend configured");
    let repo = RestTaskRepository::new(config).context("Failed to build HTTP client")?;
    Ok(TaskService::new(repo))
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let dir = data_dir(cli.data_dir.clone())?;

    let command = cli.command.take().unwrap_or(Commands::Tui);
    if let Commands::Tui = &command {
        logging::init_file(&dir)?;
    } else {
        logging::init_stderr();
    }

    match command {
        Commands::List => {
            let service = backend(&cli, &dir)?;
            let runtime = Runtime::new()?;
            let mut tasks = TaskList::new();
            runtime.block_on(service.load(&mut tasks))?;
            println!("{}", list::render_tasks(tasks.tasks()));
        }
        Commands::Add { args } => {
            let mut tasks = TaskList::new();
            tasks.set_draft(args.join(" "));
            if tasks.add_request().is_none() {
                return Err(anyhow!("Task name is required."));
            }
            let service = backend(&cli, &dir)?;
            let runtime = Runtime::new()?;
            runtime.block_on(service.add(&mut tasks))?;
            for task in tasks.tasks() {
                println!("Task added: {} (ID: {})", task.name, task.id);
            }
        }
        Commands::Toggle { id } => {
            let service = backend(&cli, &dir)?;
            let runtime = Runtime::new()?;
            let mut tasks = TaskList::new();
            runtime.block_on(service.load(&mut tasks))?;
            let current = tasks
                .get(id)
                .map(|t| t.is_completed)
                .ok_or_else(|| anyhow!("Task with ID {} not found", id))?;
            runtime.block_on(service.toggle_complete(&mut tasks, id, current))?;
            if let Some(task) = tasks.get(id) {
                let state = if task.is_completed { "done" } else { "not done" };
                println!("Task {} is now {}: {}", task.id, state, task.name);
            }
        }
        Commands::Delete { id } => {
            let service = backend(&cli, &dir)?;
            let runtime = Runtime::new()?;
            let mut tasks = TaskList::new();
            runtime.block_on(service.delete(&mut tasks, id))?;
            println!("Task {} deleted", id);
        }
        Commands::Theme { action } => {
            let mut theme = ThemeController::new(FilePreferenceStore::new(&dir));
            match action {
                Some(ThemeAction::Toggle) => {
                    let now = theme.toggle()?;
                    println!("Theme switched to {}", now);
                }
                Some(ThemeAction::Show) | None => println!("{}", theme.theme()),
            }
        }
        Commands::Tui => {
            let service = backend(&cli, &dir)?;
            let theme = ThemeController::new(FilePreferenceStore::new(&dir));
            tui::run(service, theme)?;
        }
    }
    Ok(())
}
