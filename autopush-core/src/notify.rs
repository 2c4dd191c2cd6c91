//! Fire-and-forget local desktop notifications.
//!
//! Callers cannot tell failure from success; a failed notifier is only
//! visible at debug level.

/// Show a desktop notification with `title` and `message`.
pub fn notify(title: &str, message: &str) {
    #[cfg(target_os = "linux")]
    {
        let result = std::process::Command::new("notify-send")
            .arg(title)
            .arg(message)
            .status();
        if let Err(e) = result {
            tracing::debug!("notify-send failed: {e}");
        }
    }

    #[cfg(target_os = "macos")]
    {
        let script = format!("display notification {message:?} with title {title:?}");
        let result = std::process::Command::new("osascript")
            .arg("-e")
            .arg(script)
            .status();
        if let Err(e) = result {
            tracing::debug!("osascript notification failed: {e}");
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        tracing::debug!("no notifier on this platform: {title}: {message}");
    }
}
