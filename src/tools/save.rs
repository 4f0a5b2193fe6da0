//! Save-to-file tool: appends research notes to a text file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

pub const SAVE_TOOL: &str = "save_text_to_file";

#[derive(Debug, Clone)]
pub struct SaveConfig {
    pub path: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("research_output.txt"),
        }
    }
}

/// Append `data` with a timestamp header and report where it went.
pub fn save_text_to_file(config: &SaveConfig, data: &str) -> Result<String> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let block = format!("--- Research Output ---\nTimestamp: {}\n\n{}\n\n", timestamp, data);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)?;
    file.write_all(block.as_bytes())?;

    tracing::info!(path = %config.path.display(), "Saved research notes");
    Ok(format!("Data successfully saved to {}", config.path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let config = SaveConfig {
            path: dir.path().join("notes.txt"),
        };

        let confirmation = save_text_to_file(&config, "first").unwrap();
        assert!(confirmation.starts_with("Data successfully saved to"));
        save_text_to_file(&config, "second").unwrap();

        let contents = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(contents.matches("--- Research Output ---").count(), 2);
        assert!(contents.find("first").unwrap() < contents.find("second").unwrap());
        assert!(contents.contains("Timestamp: "));
    }

    #[test]
    fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = SaveConfig {
            path: dir.path().join("missing").join("notes.txt"),
        };
        assert!(save_text_to_file(&config, "x").is_err());
    }
}
