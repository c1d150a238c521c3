// crates/loopdesk-ui/src/helpers/log.rs
//
// Release builds on Windows run without a console, so anything worth seeing
// after the fact also goes to %TEMP%/loopdesk.log (append-only).
//
//   loopdesk_log!("[media] {id}: {msg}");

use std::io::Write;

/// Append `msg` to the Loopdesk log file in the OS temp directory and echo it
/// to stderr. Failures are ignored.
pub fn vlog(msg: &str) {
    eprintln!("{msg}");
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("loopdesk.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// `format!`-style front end for [`vlog`].
#[macro_export]
macro_rules! loopdesk_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::vlog(&format!($($arg)*))
    };
}
