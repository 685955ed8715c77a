//! Directory listing
//!
//! Renders `ls -la`-style listing lines for LIST. Clients treat the output
//! as opaque display text, so the exact column widths are not contractual;
//! the mode/links/owner/group/size/date/name shape is.

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::StorageError;
use crate::storage::operations::stat_dir;

/// Produces one listing line per entry for the directory at `path`,
/// starting with `.` and `..`, followed by the entries sorted by name.
pub fn list_directory(path: &Path) -> Result<Vec<String>, StorageError> {
    stat_dir(path)?;

    let mut lines = Vec::new();
    lines.push(format_entry(".", &std::fs::metadata(path)?));
    if let Some(parent) = path.parent() {
        if let Ok(metadata) = std::fs::metadata(parent) {
            lines.push(format_entry("..", &metadata));
        }
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Do not follow symlinks; a dangling link still gets a line.
        if let Ok(metadata) = std::fs::symlink_metadata(entry.path()) {
            entries.push((name, metadata));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, metadata) in &entries {
        lines.push(format_entry(name, metadata));
    }
    Ok(lines)
}

fn format_entry(name: &str, metadata: &Metadata) -> String {
    format!(
        "{}{} {:>3} {:>5} {:>5} {:>10} {} {}",
        file_type_char(metadata),
        mode_string(metadata.mode()),
        metadata.nlink(),
        metadata.uid(),
        metadata.gid(),
        metadata.len(),
        format_mtime(metadata.modified().ok()),
        name
    )
}

fn file_type_char(metadata: &Metadata) -> char {
    if metadata.file_type().is_symlink() {
        'l'
    } else if metadata.is_dir() {
        'd'
    } else {
        '-'
    }
}

fn mode_string(mode: u32) -> String {
    let mut out = String::with_capacity(9);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// `ls` date column: `Mmm dd HH:MM` for recent files, `Mmm dd  YYYY` for
/// anything older than about six months or timestamped in the future.
fn format_mtime(mtime: Option<SystemTime>) -> String {
    let Some(mtime) = mtime else {
        return "Jan  1  1970".to_string();
    };
    let mtime: DateTime<Local> = mtime.into();
    let age = Local::now().signed_duration_since(mtime);
    if age.num_days() > 182 || age.num_seconds() < -60 {
        mtime.format("%b %e  %Y").to_string()
    } else {
        mtime.format("%b %e %H:%M").to_string()
    }
}
