// 💾 Unique List Writer - "{title} - {author}" per line, written atomically

use crate::record::BookRecord;
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write the unique list to `path`.
///
/// Lines go to a temp file next to the target which is renamed over it only
/// once everything is flushed, so a failed run never leaves a half-written list.
pub fn write_unique_list(path: &Path, records: &[BookRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        for record in records {
            writeln!(writer, "{}", record.display_line())
                .with_context(|| format!("Failed to write unique list for {}", path.display()))?;
        }
        writer.flush().context("Failed to flush unique list")?;
    }

    temp.persist(path)
        .with_context(|| format!("Failed to move unique list into place: {}", path.display()))?;

    Ok(())
}
