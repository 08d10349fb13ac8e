mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

/// Global override for the workspace directory (set by -C flag)
static WORKSPACE_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::app::App;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::theme::Palette;
use crate::cli::watch;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::state::{self, UiState};
use crate::io::storage::DirStore;
use crate::io::workspace_io::{self, WorkspaceError};
use crate::model::action::{Action, TaskDraft, TaskUpdates};
use crate::model::config::Theme;
use crate::model::route::Route;
use crate::model::task::{Priority, Task, TaskId};
use crate::model::workspace::Workspace;
use crate::ops::reminder::countdown;
use crate::ops::stats;
use crate::ops::view::{self, ViewQuery};
use crate::parse::parse_title_labels;
use crate::util::clock::{Clock, SystemClock};
use crate::util::dates::parse_due;

type CliApp = App<DirStore, SystemClock>;
type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Entries shown by `td activity` and the activity route
const DEFAULT_ACTIVITY_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    // Store -C override for load_workspace_cwd()
    if let Some(ref dir) = cli.workspace_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        set_workspace_override(abs);
    }

    match cli.command {
        // No subcommand: reopen the last route
        None => cmd_home(json),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before workspace discovery
            Commands::Init(args) => cmd_init(args, cli.workspace_dir.as_deref()),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Dashboard => cmd_dashboard(json),
            Commands::Activity(args) => cmd_activity(args, json),
            Commands::Remind(args) => cmd_remind(args, json),
            Commands::Open(args) => cmd_open(args, json),
            Commands::Theme(args) => cmd_theme(args, json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Edit(args) => cmd_edit(args, json),
            Commands::Toggle(args) => run_action(Action::ToggleTask(args.id), json),
            Commands::Delete(args) => run_action(Action::DeleteTask(args.id), json),
            Commands::Sub(args) => cmd_sub(args, json),
            Commands::Dispatch(args) => cmd_dispatch(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn set_workspace_override(dir: PathBuf) {
    WORKSPACE_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .replace(dir);
}

fn load_workspace_cwd() -> Result<Workspace, WorkspaceError> {
    let over = WORKSPACE_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    let start = match over {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let root = workspace_io::discover_workspace(&start)?;
    workspace_io::load_workspace(&root)
}

fn open_app(ws: &Workspace) -> CliApp {
    App::load(DirStore::new(&ws.data_dir), SystemClock, ws.config.clone())
}

fn palette(ws: &Workspace) -> Palette {
    Palette::for_terminal(ws.config.ui.theme)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn find_task(app: &CliApp, id: TaskId) -> Result<&Task, String> {
    app.task(id).ok_or_else(|| format!("task not found: {}", id))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse::<Priority>()
}

/// Split a comma-separated label list. An empty string yields no labels.
fn split_labels(s: &str) -> Vec<String> {
    s.split(',').map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect()
}

fn read_ui_state(ws: &Workspace) -> UiState {
    state::read_ui_state(&ws.data_dir).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

/// Lock the store, dispatch `action`, and report what happened.
fn run_action(action: Action, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let _lock = StoreLock::acquire_default(&ws.data_dir)?;
    let mut app = open_app(&ws);

    let kind = action.kind().to_string();
    let affected = match &action {
        Action::UpdateTask { id, .. } | Action::ToggleTask(id) => Some(*id),
        Action::AddSubtask { task_id, .. }
        | Action::ToggleSubtask { task_id, .. }
        | Action::DeleteSubtask { task_id, .. } => Some(*task_id),
        _ => None,
    };
    let is_add = matches!(action, Action::AddTask(_));

    let result = app.dispatch(action)?;
    let now = app.clock().now();
    // Reminders are re-evaluated after every change
    let reminder = if result.changed { app.reminder() } else { None };

    let task = if is_add && result.changed {
        app.tasks().last()
    } else {
        affected.and_then(|id| app.task(id))
    };

    if json {
        return print_json(&DispatchJson {
            action: &kind,
            changed: result.changed,
            activity: result.entry.as_ref(),
            task: task.map(task_to_json),
            reminder: reminder.map(|t| ReminderJson {
                task: Some(task_to_json(t)),
                countdown: t.due_date.map(|due| countdown(due, now)),
            }),
        });
    }

    if is_add && let Some(task) = task {
        println!("{}", task.id);
    } else if let Some(entry) = &result.entry {
        println!("{}", entry.message);
    } else if !result.changed {
        eprintln!("nothing changed");
    }
    if let Some(task) = reminder {
        for line in format_reminder(task, now, &palette(&ws)) {
            eprintln!("{}", line);
        }
    }
    Ok(())
}

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let parsed = parse_title_labels(&args.text);
    // Blank text is passed through; the reducer ignores it
    let priority = match args.priority.as_deref() {
        Some(p) => parse_priority(p)?,
        None => ws.config.ui.default_priority,
    };
    let due_date = args
        .due
        .as_deref()
        .map(|d| parse_due(d, SystemClock.now()))
        .transpose()?;

    let draft = TaskDraft {
        text: parsed.text,
        description: args.description.filter(|d| !d.trim().is_empty()),
        due_date,
        priority,
        tags: parsed.tags.into_iter().chain(args.tag).collect(),
        collaborators: parsed.collaborators.into_iter().chain(args.collab).collect(),
    };
    run_action(Action::AddTask(draft), json)
}

fn cmd_edit(args: EditArgs, json: bool) -> CmdResult {
    let due_date = if args.clear_due {
        Some(None)
    } else {
        args.due
            .as_deref()
            .map(|d| parse_due(d, SystemClock.now()))
            .transpose()?
            .map(Some)
    };

    let updates = TaskUpdates {
        text: args.text,
        description: args
            .description
            .map(|d| if d.trim().is_empty() { None } else { Some(d) }),
        due_date,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        tags: args.tags.as_deref().map(split_labels),
        collaborators: args.collaborators.as_deref().map(split_labels),
    };
    if updates.is_empty() {
        return Err("nothing to edit (see `td edit --help`)".into());
    }

    run_action(
        Action::UpdateTask {
            id: args.id,
            updates,
        },
        json,
    )
}

fn cmd_sub(args: SubCmd, json: bool) -> CmdResult {
    let action = match args.action {
        SubAction::Add(a) => Action::AddSubtask {
            task_id: a.id,
            text: a.text,
        },
        SubAction::Toggle(a) => Action::ToggleSubtask {
            task_id: a.id,
            subtask_id: a.subtask_id,
        },
        SubAction::Rm(a) => Action::DeleteSubtask {
            task_id: a.id,
            subtask_id: a.subtask_id,
        },
    };
    run_action(action, json)
}

fn cmd_dispatch(args: DispatchArgs, json: bool) -> CmdResult {
    let action =
        Action::from_json(&args.action).map_err(|e| format!("invalid action JSON: {}", e))?;
    if let Action::Unknown(kind) = &action {
        tracing::warn!(kind = %kind, "ignoring unknown action type");
    }
    run_action(action, json)
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let mut ui = read_ui_state(&ws);

    let touched = args.reset || args.filter.is_some() || args.sort.is_some() || args.search.is_some();
    if args.reset {
        ui.query = ViewQuery::default();
    }
    if let Some(f) = args.filter.as_deref() {
        ui.query.filter = f.parse()?;
    }
    if let Some(s) = args.sort.as_deref() {
        ui.query.sort = match s {
            "none" | "" => None,
            key => Some(key.parse()?),
        };
    }
    if let Some(term) = args.search {
        ui.query.search = term;
    }
    if touched {
        state::write_ui_state(&ws.data_dir, &ui)?;
    }

    render_tasks(&ws, &open_app(&ws), &ui.query, json)
}

fn render_tasks(ws: &Workspace, app: &CliApp, query: &ViewQuery, json: bool) -> CmdResult {
    let visible = view::derive_view(app.tasks(), query);
    if json {
        return print_json(&TaskListJson {
            query,
            tasks: visible.iter().map(|t| task_to_json(t)).collect(),
        });
    }
    print_lines(format_task_list(&visible, query, app.clock().now(), &palette(ws)));
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let app = open_app(&ws);
    let task = find_task(&app, args.id)?;
    let now = app.clock().now();

    if json {
        return print_json(&TaskDetailJson {
            task: task_to_json(task),
            countdown: task.due_date.map(|due| countdown(due, now)),
        });
    }

    print_lines(format_task_detail(task, now, &palette(&ws)));
    if args.watch {
        match task.due_date {
            Some(due) if !task.completed => {
                println!();
                watch::watch("time remaining", due, SystemClock)?;
            }
            Some(_) => eprintln!("task is completed; nothing to count down"),
            None => eprintln!("task has no due date; nothing to count down"),
        }
    }
    Ok(())
}

fn cmd_dashboard(json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    render_dashboard(&ws, &open_app(&ws), json)
}

fn render_dashboard(ws: &Workspace, app: &CliApp, json: bool) -> CmdResult {
    let stats = stats::compute(app.tasks(), app.clock().now());
    if json {
        return print_json(&stats);
    }
    print_lines(format_dashboard(&stats, &palette(ws)));
    Ok(())
}

fn cmd_activity(args: ActivityArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    render_activity(&ws, &open_app(&ws), args.limit, json)
}

fn render_activity(ws: &Workspace, app: &CliApp, limit: usize, json: bool) -> CmdResult {
    let entries = app.activity().recent(limit);
    if json {
        return print_json(&entries);
    }
    print_lines(format_activity(entries, &palette(ws)));
    Ok(())
}

fn cmd_remind(args: RemindArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let app = open_app(&ws);
    let now = app.clock().now();
    let task = app.reminder();

    if json {
        return print_json(&ReminderJson {
            task: task.map(task_to_json),
            countdown: task.and_then(|t| t.due_date).map(|due| countdown(due, now)),
        });
    }

    let Some(task) = task else {
        println!(
            "no tasks due in the next {} minutes",
            ws.config.reminders.window_minutes
        );
        return Ok(());
    };
    print_lines(format_reminder(task, now, &palette(&ws)));
    if args.watch
        && let Some(due) = task.due_date
    {
        println!();
        if watch::watch(&task.text, due, SystemClock)? == watch::WatchEnd::Dismissed {
            println!("reminder dismissed");
        }
    }
    Ok(())
}

fn cmd_open(args: OpenArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let route = Route::from_path(&args.path);
    let mut ui = read_ui_state(&ws);
    ui.route = route;
    state::write_ui_state(&ws.data_dir, &ui)?;
    tracing::debug!(path = %args.path, route = route.path(), "opened route");
    render_route(&ws, route, &ui.query, json)
}

fn cmd_home(json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let ui = read_ui_state(&ws);
    render_route(&ws, ui.route, &ui.query, json)
}

fn render_route(ws: &Workspace, route: Route, query: &ViewQuery, json: bool) -> CmdResult {
    let app = open_app(ws);
    match route {
        Route::Tasks => render_tasks(ws, &app, query, json),
        Route::Dashboard => render_dashboard(ws, &app, json),
        Route::Activity => render_activity(ws, &app, DEFAULT_ACTIVITY_LIMIT, json),
    }
}

#[derive(Serialize)]
struct ThemeJson {
    theme: Theme,
}

fn cmd_theme(args: ThemeArgs, json: bool) -> CmdResult {
    let ws = load_workspace_cwd()?;
    let theme = match args.theme.as_deref() {
        Some(name) => name.parse::<Theme>()?,
        None => ws.config.ui.theme.toggled(),
    };

    let mut doc = config_io::read_config_doc(&ws.data_dir)?;
    config_io::set_theme(&mut doc, theme);
    config_io::write_config_doc(&ws.data_dir, &doc)?;

    if json {
        return print_json(&ThemeJson { theme });
    }
    println!("theme: {}", theme.as_str());
    Ok(())
}
