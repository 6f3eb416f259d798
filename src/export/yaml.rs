//! YAML Export functionality

use std::io::Write;

use crate::error::{TallyError, TallyResult};

use super::json::UserExport;

/// Same content as the JSON export, with a comment header
pub fn export_yaml<W: Write>(export: &UserExport, writer: &mut W) -> TallyResult<()> {
    let header = format!(
        "# Tally export for {}\n# Generated: {}\n# App Version: {}\n\n",
        export.user, export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TallyError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}
