//! URL utilities for detecting asset types by extension.
//!
//! Gateway URLs for course videos usually end in the original file name, so
//! the extension is enough to tell a playable video from other assets.

/// List of recognised video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi"];

/// Return the lowercased text after the last `.` of `url`.
///
/// A URL without a dot yields the whole URL lowercased and an empty URL
/// yields an empty string.
///
/// # Examples
///
/// ```
/// use coursenft_common::paths::file_extension;
///
/// assert_eq!(file_extension("https://ipfs.io/ipfs/Qm1/Flow.MP4"), "mp4");
/// assert_eq!(file_extension(""), "");
/// ```
pub fn file_extension(url: &str) -> String {
    url.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// Check if a URL points at a video file.
///
/// # Examples
///
/// ```
/// use coursenft_common::paths::is_video_file;
///
/// assert!(is_video_file("ipfs://Qm1/lesson.webm"));
/// assert!(!is_video_file("ipfs://Qm1/1.json"));
/// ```
pub fn is_video_file(url: &str) -> bool {
    VIDEO_EXTENSIONS.contains(&file_extension(url).as_str())
}
