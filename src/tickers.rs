use anyhow::Context;
use std::path::Path;

/// Reads the reference list of dividend payers, one entry per line.
/// Blank lines and `#` comments are skipped.
pub fn load(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ticker list {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
