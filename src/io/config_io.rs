use std::fs;
use std::path::Path;

use crate::io::workspace_io::WorkspaceError;
use crate::model::config::Theme;

/// Read config.toml as an editable document (comments and layout preserved).
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, WorkspaceError> {
    let config_path = data_dir.join("config.toml");
    let text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(text.parse::<toml_edit::DocumentMut>()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(
    data_dir: &Path,
    doc: &toml_edit::DocumentMut,
) -> Result<(), WorkspaceError> {
    let config_path = data_dir.join("config.toml");
    fs::write(&config_path, doc.to_string())?;
    Ok(())
}

/// Set `ui.theme` in the document, creating the `[ui]` table if needed.
pub fn set_theme(doc: &mut toml_edit::DocumentMut, theme: Theme) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["theme"] = toml_edit::value(theme.as_str());
}
