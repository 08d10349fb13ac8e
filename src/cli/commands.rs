use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - tasks, subtasks, reminders"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit fields of a task
    Edit(EditArgs),
    /// Toggle a task between pending and completed
    Toggle(IdArg),
    /// Delete a task and its subtasks
    Delete(IdArg),
    /// Add, toggle or remove subtasks
    Sub(SubCmd),
    /// List tasks (filter, sort, search)
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Show task statistics
    Dashboard,
    /// Show the activity log
    Activity(ActivityArgs),
    /// Show the task due within the reminder window
    Remind(RemindArgs),
    /// Open a view by path (/, /dashboard, /activity)
    Open(OpenArgs),
    /// Show, set or toggle the color theme
    Theme(ThemeArgs),
    /// Dispatch a raw JSON action: {"type": "...", "payload": ...}
    Dispatch(DispatchArgs),
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if .taskdeck/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text; trailing #tag and @name words become tags and collaborators
    pub text: String,
    /// Longer description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD, YYYY-MM-DDTHH:MM, RFC 3339, or +30m/+2h/+1d)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority: high, medium, low
    #[arg(long, short)]
    pub priority: Option<String>,
    /// Tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Collaborator (repeatable)
    #[arg(long)]
    pub collab: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New description (empty string clears it)
    #[arg(long, short)]
    pub description: Option<String>,
    /// New due date
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New priority
    #[arg(long, short)]
    pub priority: Option<String>,
    /// Replace tags (comma separated)
    #[arg(long)]
    pub tags: Option<String>,
    /// Replace collaborators (comma separated)
    #[arg(long)]
    pub collaborators: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: u64,
}

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask
    Add(SubAddArgs),
    /// Toggle a subtask
    Toggle(SubRefArgs),
    /// Remove a subtask
    Rm(SubRefArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Parent task ID
    pub id: u64,
    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct SubRefArgs {
    /// Parent task ID
    pub id: u64,
    /// Subtask ID
    pub subtask_id: u64,
}

#[derive(Args)]
pub struct DispatchArgs {
    /// Action as JSON
    pub action: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Completion filter: all, pending, completed (default: last used)
    #[arg(long, short)]
    pub filter: Option<String>,
    /// Sort key: due-date, priority (default: last used)
    #[arg(long, short)]
    pub sort: Option<String>,
    /// Case-insensitive search in text and description (default: last used)
    #[arg(long)]
    pub search: Option<String>,
    /// Forget the saved filter, sort and search
    #[arg(long)]
    pub reset: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID
    pub id: u64,
    /// Keep a live countdown to the due date (q or Esc to close)
    #[arg(long, short)]
    pub watch: bool,
}

#[derive(Args)]
pub struct ActivityArgs {
    /// Maximum number of entries to show
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Keep a live countdown (q or Esc to dismiss)
    #[arg(long, short)]
    pub watch: bool,
}

#[derive(Args)]
pub struct OpenArgs {
    /// View path; unknown paths open the task list
    #[arg(default_value = "/")]
    pub path: String,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// light or dark (omit to toggle)
    pub theme: Option<String>,
}
