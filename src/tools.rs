// External tool resolver for ffmpeg/ffprobe/whisper
//
// Resolution order:
// 1) Environment variable override (VIDEOSCOUT_FFPROBE_PATH, etc.)
// 2) Sidecar next to the executable
// 3) bin/ subdirectory next to the executable
// 4) PATH fallback

use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Get the directory containing the current executable
fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

/// Resolve a tool path.
fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    if let Ok(v) = env::var(env_key) {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
        log::warn!("{} points at missing file {}, ignoring", env_key, v);
    }

    let mut filename = default_name.to_string();
    if cfg!(windows) && !filename.to_lowercase().ends_with(".exe") {
        filename.push_str(".exe");
    }

    if let Some(dir) = exe_dir() {
        let candidate = dir.join(&filename);
        if candidate.exists() {
            return candidate;
        }

        let bin_candidate = dir.join("bin").join(&filename);
        if bin_candidate.exists() {
            return bin_candidate;
        }
    }

    PathBuf::from(default_name)
}

/// Get path to ffprobe binary
pub fn ffprobe_path() -> PathBuf {
    resolve_tool("VIDEOSCOUT_FFPROBE_PATH", "ffprobe")
}

/// Get path to ffmpeg binary
pub fn ffmpeg_path() -> PathBuf {
    resolve_tool("VIDEOSCOUT_FFMPEG_PATH", "ffmpeg")
}

/// Get path to the whisper.cpp command line binary
pub fn whisper_path() -> PathBuf {
    resolve_tool("VIDEOSCOUT_WHISPER_PATH", "whisper-cli")
}

/// Check if a tool is available at the resolved path
pub fn is_tool_available(tool: &str) -> bool {
    let (path, probe_arg) = match tool {
        "ffprobe" => (ffprobe_path(), "-version"),
        "ffmpeg" => (ffmpeg_path(), "-version"),
        "whisper" => (whisper_path(), "--help"),
        _ => return false,
    };

    if path.exists() {
        return true;
    }

    // PATH fallback: try running it
    Command::new(&path)
        .arg(probe_arg)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tool_fallback() {
        let path = resolve_tool("VIDEOSCOUT_TEST_NONEXISTENT", "testcmd");
        assert_eq!(path, PathBuf::from("testcmd"));
    }

    #[test]
    fn test_env_override() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();

        std::env::set_var("VIDEOSCOUT_TEST_TOOL", temp_file.path());
        let path = resolve_tool("VIDEOSCOUT_TEST_TOOL", "default");
        assert_eq!(path, temp_file.path());

        std::env::remove_var("VIDEOSCOUT_TEST_TOOL");
    }

    #[test]
    fn test_env_override_missing_file_ignored() {
        std::env::set_var("VIDEOSCOUT_TEST_MISSING_TOOL", "/definitely/not/here/tool");
        let path = resolve_tool("VIDEOSCOUT_TEST_MISSING_TOOL", "fallback");
        assert_eq!(path, PathBuf::from("fallback"));
        std::env::remove_var("VIDEOSCOUT_TEST_MISSING_TOOL");
    }

    #[test]
    fn test_unknown_tool_unavailable() {
        assert!(!is_tool_available("exiftool"));
    }
}
