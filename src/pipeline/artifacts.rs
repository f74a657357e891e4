use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;

use crate::error::Result;

pub const RAW_PREFIX: &str = "reviews_";
pub const PROCESSED_PREFIX: &str = "processed_reviews_";

pub fn raw_artifact_name(app_id: &str) -> String {
    format!(
        "{}{}_{}.csv",
        RAW_PREFIX,
        app_id,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

pub fn processed_artifact_name() -> String {
    format!(
        "{}{}.csv",
        PROCESSED_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

// Newest CSV in dir with the given prefix, judged by creation time where the
// filesystem reports one, modification time otherwise.
pub fn most_recent(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !name.starts_with(prefix) || !name.ends_with(".csv") {
            continue;
        }

        let metadata = entry.metadata()?;
        let stamp = metadata.created().or_else(|_| metadata.modified())?;

        match &newest {
            Some((best, _)) if *best >= stamp => {}
            _ => newest = Some((stamp, path)),
        }
    }

    Ok(newest.map(|(_, path)| path))
}
