//! CLI - Command Line Interface
//!
//! Available Commands:
//! - taskdeck [tui]                 - Interactive landing + task list screens
//! - taskdeck list                  - Print the task list
//! - taskdeck add <title>           - Create a task
//! - taskdeck toggle <id>           - Flip a task's completion
//! - taskdeck rename <id> <title>   - Change a task's title
//! - taskdeck delete <id> --yes     - Remove a task
//!
//! One-shot commands drive the same `TaskListController` the TUI uses, so a
//! failed store call surfaces as the controller's banner or alert text.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use taskdeck_core::{BackendKind, ConfigError, Task, TaskId, TaskTitle, TaskdeckConfig, TitleError};
use taskdeck_runtime::TaskListController;
use taskdeck_storage::{SharedTaskStore, StoreError, create_task_store};

/// Environment variable holding the tracing filter directive
pub const ENV_LOG: &str = "TASKDECK_LOG";

/// CLI Errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Refusing to delete task {0} without --yes")]
    ConfirmationRequired(TaskId),

    /// A store call failed; carries the message the user would see in the UI
    #[error("{0}")]
    Operation(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// CLI Configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Resolved settings: file, then environment, then flags
    pub taskdeck: TaskdeckConfig,

    /// Keep the local collection in memory only
    pub ephemeral: bool,

    /// Verbose output
    pub verbose: bool,

    /// Output format
    pub output_format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            taskdeck: TaskdeckConfig::default(),
            ephemeral: false,
            verbose: false,
            output_format: OutputFormat::Pretty,
        }
    }
}

impl CliConfig {
    /// Human-readable description of the active backend.
    pub fn backend_label(&self) -> String {
        match self.taskdeck.backend {
            BackendKind::Remote => format!("remote ({})", self.taskdeck.remote.base_url),
            BackendKind::Local if self.ephemeral => "local (memory)".to_string(),
            BackendKind::Local => {
                format!("local ({})", self.taskdeck.local.data_dir.display())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Taskdeck CLI
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about = "Terminal todo list over a remote or local task store", long_about = None)]
pub(crate) struct Cli {
    /// Config file (defaults to .taskdeck/config.yaml when present)
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Task store backend
    #[arg(long, global = true, value_enum)]
    pub(crate) backend: Option<BackendArg>,

    /// Base URL of the remote todo API
    #[arg(long, global = true)]
    pub(crate) base_url: Option<String>,

    /// Data directory for the local backend
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Keep local tasks in memory only
    #[arg(long, global = true)]
    pub(crate) ephemeral: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub(crate) output: Option<OutputFormat>,

    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub(crate) enum BackendArg {
    Remote,
    Local,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Remote => BackendKind::Remote,
            BackendArg::Local => BackendKind::Local,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub(crate) enum Commands {
    /// Start the interactive task list (default)
    Tui,

    /// Print the task list
    List,

    /// Create a task
    Add(AddArgs),

    /// Flip a task between active and done
    Toggle(IdArgs),

    /// Change a task's title
    Rename(RenameArgs),

    /// Remove a task
    Delete(DeleteArgs),
}

#[derive(Args, Debug, PartialEq)]
pub(crate) struct AddArgs {
    /// Task title
    pub title: String,
}

#[derive(Args, Debug, PartialEq)]
pub(crate) struct IdArgs {
    /// Task id
    pub id: u64,
}

#[derive(Args, Debug, PartialEq)]
pub(crate) struct RenameArgs {
    /// Task id
    pub id: u64,

    /// New title
    pub title: String,
}

#[derive(Args, Debug, PartialEq)]
pub(crate) struct DeleteArgs {
    /// Task id
    pub id: u64,

    /// Confirm the deletion
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    /// Merge config file, environment and flags, in that order.
    pub(crate) fn resolve_config(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<CliConfig, CliError> {
        let mut taskdeck = TaskdeckConfig::load_or_default(self.config.as_deref())?;
        taskdeck.apply_overrides_from(lookup)?;

        if let Some(backend) = self.backend {
            taskdeck.backend = backend.into();
        }
        if let Some(url) = &self.base_url {
            taskdeck.remote.base_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            taskdeck.local.data_dir = dir.clone();
        }

        Ok(CliConfig {
            taskdeck,
            ephemeral: self.ephemeral,
            verbose: self.verbose,
            output_format: self.output.unwrap_or(OutputFormat::Pretty),
        })
    }
}

/// Install the stderr subscriber when asked for via `-v` or `TASKDECK_LOG`.
fn init_tracing(verbose: bool) {
    let from_env = std::env::var(ENV_LOG).ok().filter(|v| !v.trim().is_empty());
    if !verbose && from_env.is_none() {
        return;
    }
    let filter = match from_env {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse CLI arguments and execute commands
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.resolve_config(|key| std::env::var(key).ok())?;
    debug!(backend = %config.backend_label(), "configuration resolved");

    let store = create_task_store(&config.taskdeck, config.ephemeral)?;
    let command = cli.command.unwrap_or(Commands::Tui);
    let mut stdout = std::io::stdout();
    execute(command, &config, store, &mut stdout).await
}

pub(crate) async fn execute(
    command: Commands,
    config: &CliConfig,
    store: SharedTaskStore,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let controller = TaskListController::new(store);
    match command {
        Commands::Tui => cmd_tui(controller, config).await,
        Commands::List => cmd_list(controller, config, out).await,
        Commands::Add(args) => cmd_add(controller, args, config, out).await,
        Commands::Toggle(args) => cmd_toggle(controller, args, config, out).await,
        Commands::Rename(args) => cmd_rename(controller, args, config, out).await,
        Commands::Delete(args) => cmd_delete(controller, args, out).await,
    }
}

async fn cmd_tui(controller: TaskListController, config: &CliConfig) -> Result<(), CliError> {
    info!(backend = %config.backend_label(), "starting interactive session");
    taskdeck_tui::run_tui(controller, config.backend_label())
        .await
        .map_err(|e| CliError::Terminal(e.to_string()))
}

async fn cmd_list(
    mut controller: TaskListController,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    load(&mut controller).await?;
    match config.output_format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(controller.tasks())?)?;
        }
        OutputFormat::Pretty => {
            if controller.tasks().is_empty() {
                writeln!(out, "No tasks yet.")?;
            }
            for task in controller.tasks() {
                writeln!(out, "{}", format_task(task))?;
            }
            writeln!(
                out,
                "{} active, {} done",
                controller.active_count(),
                controller.done_count()
            )?;
        }
    }
    Ok(())
}

async fn cmd_add(
    mut controller: TaskListController,
    args: AddArgs,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let title = TaskTitle::parse(&args.title)?;
    controller.create(title.as_str()).await;
    fail_on_alert(&controller)?;
    let task = controller
        .tasks()
        .first()
        .ok_or_else(|| CliError::Operation("task was not created".to_string()))?;
    print_task(task, config, out)
}

async fn cmd_toggle(
    mut controller: TaskListController,
    args: IdArgs,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = TaskId(args.id);
    load(&mut controller).await?;
    if controller.task(id).is_none() {
        return Err(CliError::TaskNotFound(id));
    }
    controller.toggle(id).await;
    fail_on_alert(&controller)?;
    let task = controller.task(id).ok_or(CliError::TaskNotFound(id))?;
    print_task(task, config, out)
}

async fn cmd_rename(
    mut controller: TaskListController,
    args: RenameArgs,
    config: &CliConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = TaskId(args.id);
    let title = TaskTitle::parse(&args.title)?;
    load(&mut controller).await?;
    if !controller.start_edit(id) {
        return Err(CliError::TaskNotFound(id));
    }
    controller.set_draft(title.into_inner());
    controller.submit_edit();
    controller.confirm_edit().await;
    fail_on_alert(&controller)?;
    let task = controller.task(id).ok_or(CliError::TaskNotFound(id))?;
    print_task(task, config, out)
}

async fn cmd_delete(
    mut controller: TaskListController,
    args: DeleteArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = TaskId(args.id);
    if !args.yes {
        return Err(CliError::ConfirmationRequired(id));
    }
    load(&mut controller).await?;
    if !controller.request_delete(id) {
        return Err(CliError::TaskNotFound(id));
    }
    controller.confirm_delete().await;
    fail_on_alert(&controller)?;
    writeln!(out, "Deleted task {id}")?;
    Ok(())
}

async fn load(controller: &mut TaskListController) -> Result<(), CliError> {
    controller.load().await;
    match controller.banner() {
        Some(banner) => Err(CliError::Operation(banner.to_string())),
        None => Ok(()),
    }
}

fn fail_on_alert(controller: &TaskListController) -> Result<(), CliError> {
    match controller.alert() {
        Some(alert) => Err(CliError::Operation(alert.to_string())),
        None => Ok(()),
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {:>4}  {}", task.id.get(), task.title)
}

fn print_task(task: &Task, config: &CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    match config.output_format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(task)?)?,
        OutputFormat::Pretty => writeln!(out, "{}", format_task(task))?,
    }
    Ok(())
}
