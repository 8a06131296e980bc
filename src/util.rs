use anyhow::{Context, Result};
use query_annotator::Intent;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse JSON {}", path.display()))
}

/// Write pretty JSON to `out`, or stdout when no path is given.
pub fn emit_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize JSON")?;
    text.push('\n');
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote JSON");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

/// Parse a JSONL intent script; blank lines and `#` comments are skipped.
pub fn parse_intents(text: &str, origin: &str) -> Result<Vec<(usize, Intent)>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line)
                .map(|intent| (line_no, intent))
                .with_context(|| format!("parse intent at {origin}:{line_no}"))
        })
        .collect()
}

pub fn load_intents(path: &Path) -> Result<Vec<(usize, Intent)>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_intents(&text, &path.display().to_string())
}
