// Video discovery for batch runs

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::constants::VIDEO_EXTENSIONS;
use crate::error::{Result, ScoutError};

/// Discover all video files under a path.
/// A single file is returned as-is if it has a video extension.
pub fn discover_videos(source_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if source_path.is_file() {
        if is_video_file(source_path) {
            files.push(source_path.to_path_buf());
        }
    } else if source_path.is_dir() {
        for entry in WalkDir::new(source_path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && !is_hidden(path) && is_video_file(path) {
                files.push(path.to_path_buf());
            }
        }
    } else {
        return Err(ScoutError::NotFound(format!(
            "Path not found: {}",
            source_path.display()
        )));
    }

    // Sort by path for consistent ordering
    files.sort();

    Ok(files)
}

/// Check if a file is a video based on extension (case-insensitive)
pub fn is_video_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_lowercase(),
        None => return false,
    };

    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

// macOS resource forks (._clip.mp4) and other dotfiles
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
