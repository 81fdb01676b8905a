/// Time and source bucketing for destination sub-folders.
///
/// A bucket is the sub-folder name under a category directory. Files are
/// bucketed either by modification month (`2024-03`) or by a best-effort
/// source/workflow tag (`whatsapp`, `screenshots`, ...) derived from the
/// filename and parent path.
use chrono::{DateTime, Local};
use std::io;
use std::path::Path;

/// Bucket used when no source rule matches.
pub const DEFAULT_SOURCE_BUCKET: &str = "manual_or_unknown";

/// Returns the `YYYY-MM` bucket for a file's modification time.
///
/// # Errors
///
/// Fails when the file's metadata or modification time cannot be read,
/// e.g. because the file vanished after scanning.
pub fn month_bucket(path: &Path) -> io::Result<String> {
    let modified = path.metadata()?.modified()?;
    let modified: DateTime<Local> = modified.into();
    Ok(modified.format("%Y-%m").to_string())
}

/// Lowercased name/parent/extension of a candidate, matched by source rules.
struct RuleInput {
    name: String,
    parent: String,
    ext: String,
}

impl RuleInput {
    fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let parent = path
            .parent()
            .map(|p| p.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self { name, parent, ext }
    }

    /// True if the filename or the parent path contains the needle.
    fn mentions(&self, needle: &str) -> bool {
        self.name.contains(needle) || self.parent.contains(needle)
    }

    fn name_starts_with(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }

    fn ext_is(&self, ext: &str) -> bool {
        self.ext == ext
    }
}

/// One (predicate, tag) entry of the source classifier.
struct SourceRule {
    tag: &'static str,
    matches: fn(&RuleInput) -> bool,
}

/// Ordered rule list: evaluated top-down, first match wins. Later rules
/// never override earlier matches, so a WhatsApp screenshot stays in
/// `whatsapp` and a screenshot downloaded via Chrome stays in
/// `screenshots`.
const SOURCE_RULES: &[SourceRule] = &[
    SourceRule {
        tag: "whatsapp",
        matches: |f| f.mentions("whatsapp"),
    },
    SourceRule {
        tag: "telegram",
        matches: |f| f.mentions("telegram"),
    },
    SourceRule {
        tag: "discord",
        matches: |f| f.mentions("discord"),
    },
    SourceRule {
        tag: "slack",
        matches: |f| f.mentions("slack"),
    },
    SourceRule {
        tag: "screenshots",
        matches: |f| {
            f.name_starts_with("screenshot")
                || f.name_starts_with("snip")
                || f.name.contains("screen shot")
        },
    },
    SourceRule {
        tag: "camera_exports",
        matches: |f| {
            f.name_starts_with("img_") || f.name_starts_with("dsc_") || f.name_starts_with("pxl_")
        },
    },
    SourceRule {
        tag: "browser_downloads",
        matches: |f| f.mentions("chrome") || f.mentions("edge") || f.mentions("firefox"),
    },
    SourceRule {
        tag: "browser_partial_downloads",
        matches: |f| f.ext_is("crdownload") || f.ext_is("part"),
    },
    SourceRule {
        tag: "meetings",
        matches: |f| f.mentions("zoom") || f.mentions("meeting") || f.mentions("teams"),
    },
    SourceRule {
        tag: "torrent",
        matches: |f| f.ext_is("torrent"),
    },
];

/// Returns the source/workflow bucket for a file.
///
/// Total: falls back to [`DEFAULT_SOURCE_BUCKET`] when no rule matches.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tidysweep::bucket::source_bucket;
///
/// assert_eq!(source_bucket(Path::new("Screenshot_2023.png")), "screenshots");
/// assert_eq!(source_bucket(Path::new("notes.txt")), "manual_or_unknown");
/// ```
pub fn source_bucket(path: &Path) -> String {
    let input = RuleInput::from_path(path);
    SOURCE_RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| rule.tag.to_string())
        .unwrap_or_else(|| DEFAULT_SOURCE_BUCKET.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_month_bucket_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "content").expect("Failed to write file");

        let bucket = month_bucket(&file_path).expect("Failed to bucket file");
        let now: DateTime<Local> = Local::now();
        assert_eq!(bucket, now.format("%Y-%m").to_string());
    }

    #[test]
    fn test_month_bucket_missing_file() {
        assert!(month_bucket(Path::new("/no/such/file.txt")).is_err());
    }

    #[test]
    fn test_messenger_rules() {
        assert_eq!(source_bucket(Path::new("WhatsApp Image 2024.jpg")), "whatsapp");
        assert_eq!(source_bucket(Path::new("/media/WhatsApp/photo.jpg")), "whatsapp");
        assert_eq!(source_bucket(Path::new("Telegram_Desktop.png")), "telegram");
        assert_eq!(source_bucket(Path::new("discord_export.zip")), "discord");
        assert_eq!(source_bucket(Path::new("slack_backup.json")), "slack");
    }

    #[test]
    fn test_screenshot_rule() {
        assert_eq!(source_bucket(Path::new("Screenshot_2023.png")), "screenshots");
        assert_eq!(source_bucket(Path::new("Snip_tool_output.png")), "screenshots");
        assert_eq!(
            source_bucket(Path::new("my screen shot of stuff.png")),
            "screenshots"
        );
    }

    #[test]
    fn test_camera_export_rule() {
        assert_eq!(source_bucket(Path::new("IMG_1234.jpg")), "camera_exports");
        assert_eq!(source_bucket(Path::new("DSC_0001.jpg")), "camera_exports");
        assert_eq!(source_bucket(Path::new("PXL_20240101.jpg")), "camera_exports");
    }

    #[test]
    fn test_browser_rules() {
        assert_eq!(
            source_bucket(Path::new("chrome_download.pdf")),
            "browser_downloads"
        );
        assert_eq!(
            source_bucket(Path::new("/home/user/firefox/file.pdf")),
            "browser_downloads"
        );
        assert_eq!(
            source_bucket(Path::new("movie.mp4.crdownload")),
            "browser_partial_downloads"
        );
        assert_eq!(
            source_bucket(Path::new("archive.part")),
            "browser_partial_downloads"
        );
    }

    #[test]
    fn test_meeting_and_torrent_rules() {
        assert_eq!(source_bucket(Path::new("zoom_recording.mp4")), "meetings");
        assert_eq!(source_bucket(Path::new("teams-notes.txt")), "meetings");
        assert_eq!(source_bucket(Path::new("ubuntu.iso.torrent")), "torrent");
    }

    #[test]
    fn test_default_bucket() {
        assert_eq!(source_bucket(Path::new("notes.txt")), DEFAULT_SOURCE_BUCKET);
    }

    #[test]
    fn test_precedence_screenshot_beats_browser() {
        // The path mentions chrome, but the screenshot rule is evaluated
        // first and must win.
        assert_eq!(
            source_bucket(Path::new("/downloads/chrome/Screenshot_2023.png")),
            "screenshots"
        );
    }

    #[test]
    fn test_precedence_messenger_beats_screenshot() {
        assert_eq!(
            source_bucket(Path::new("/whatsapp/Screenshot_2023.png")),
            "whatsapp"
        );
    }

    #[test]
    fn test_rules_are_case_insensitive() {
        assert_eq!(source_bucket(Path::new("WHATSAPP-VIDEO.MP4")), "whatsapp");
        assert_eq!(source_bucket(Path::new("SCREENSHOT.PNG")), "screenshots");
    }
}
