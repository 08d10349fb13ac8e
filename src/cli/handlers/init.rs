use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::io::workspace_io;

/// Create `.taskdeck/` in the current directory, or in `dir` when given.
pub fn cmd_init(args: InitArgs, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(format!("not a directory: {}", root.display()).into());
    }

    let ws = workspace_io::init_workspace(&root, args.force)?;
    println!("initialized taskdeck workspace in {}", ws.data_dir.display());
    Ok(())
}
