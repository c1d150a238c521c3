// crates/loopdesk-core/src/source.rs
//
// Where a video comes from, and the MIME gate a local file must pass before
// the player ever sees it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VideoSource {
    File(PathBuf),
    /// Remote clip. Playable once downloaded to a temp file.
    Url(String),
}

impl VideoSource {
    /// Short name for headers and log lines.
    pub fn display_name(&self) -> String {
        match self {
            VideoSource::File(p) => p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            VideoSource::Url(u) => u.rsplit('/')
                .find(|s| !s.is_empty())
                .unwrap_or(u.as_str())
                .to_string(),
        }
    }
}

/// Extensions offered by the file picker.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "mpeg", "mpg", "ogv", "3gp", "wmv", "flv", "ts",
];

/// MIME type for a path, from its extension. `None` when unrecognised.
///
/// ```
/// use std::path::Path;
/// use loopdesk_core::source::mime_for_path;
/// assert_eq!(mime_for_path(Path::new("clip.MOV")), Some("video/quicktime"));
/// assert_eq!(mime_for_path(Path::new("notes.txt")), Some("text/plain"));
/// assert_eq!(mime_for_path(Path::new("README")), None);
/// ```
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp4"          => "video/mp4",
        "m4v"          => "video/x-m4v",
        "mov"          => "video/quicktime",
        "mkv"          => "video/x-matroska",
        "webm"         => "video/webm",
        "avi"          => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv"          => "video/ogg",
        "3gp"          => "video/3gpp",
        "wmv"          => "video/x-ms-wmv",
        "flv"          => "video/x-flv",
        "ts"           => "video/mp2t",
        "mp3"          => "audio/mpeg",
        "wav"          => "audio/wav",
        "m4a"          => "audio/mp4",
        "png"          => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif"          => "image/gif",
        "txt"          => "text/plain",
        "pdf"          => "application/pdf",
        _              => return None,
    };
    Some(mime)
}

/// Accept `path` only when its MIME type is `video/*` and the file exists.
pub fn validate_video_file(path: &Path) -> Result<PathBuf, SourceError> {
    let mime = mime_for_path(path);
    if !mime.is_some_and(|m| m.starts_with("video/")) {
        return Err(SourceError::NotVideo { path: path.to_path_buf(), mime });
    }
    if !path.is_file() {
        return Err(SourceError::Missing(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_picker_extension_is_video() {
        for ext in VIDEO_EXTENSIONS {
            let p = PathBuf::from(format!("a.{ext}"));
            assert!(mime_for_path(&p).is_some_and(|m| m.starts_with("video/")), "{ext}");
        }
    }

    #[test]
    fn rejects_non_video_before_touching_disk() {
        let err = validate_video_file(Path::new("/definitely/not/here/song.mp3")).unwrap_err();
        assert!(matches!(err, SourceError::NotVideo { mime: Some("audio/mpeg"), .. }));
        assert_eq!(err.to_string(), "Please select a valid video file (.mp4, .mov, etc.).");
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = validate_video_file(Path::new("clip")).unwrap_err();
        assert!(matches!(err, SourceError::NotVideo { mime: None, .. }));
    }

    #[test]
    fn accepts_existing_video_file() {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        assert_eq!(validate_video_file(file.path()).unwrap(), file.path());
    }

    #[test]
    fn missing_video_file_is_reported() {
        let err = validate_video_file(Path::new("/definitely/not/here/clip.mp4")).unwrap_err();
        assert!(matches!(err, SourceError::Missing(_)));
    }

    #[test]
    fn display_names() {
        assert_eq!(VideoSource::File("/tmp/a/b.mp4".into()).display_name(), "b.mp4");
        assert_eq!(
            VideoSource::Url("https://example.com/v/sample.mp4".into()).display_name(),
            "sample.mp4",
        );
    }
}
