use std::future::Future;

use chrono::Utc;

use crate::{
    error::Result,
    github::ProfileHost,
    notify::notify,
    storage::{BioSource, Settings, Storage},
    weather::{WeatherSource, format_weather},
};

/// Fixed status message set alongside every bio update.
pub const STATUS_MESSAGE: &str = "Updated by autopush";

/// Pick the bio text according to the mode flags.
///
/// An invalid flag pair (both or neither set) is reported and yields an
/// empty bio; the update still proceeds, since an empty bio is a valid
/// if useless update.
pub async fn compose_bio(settings: &Settings, weather: &dyn WeatherSource) -> Result<String> {
    match settings.bio_source() {
        BioSource::Custom(content) => Ok(content),
        BioSource::Weather => {
            let report = weather.get_weather().await?;
            Ok(format_weather(&report))
        }
        BioSource::Invalid => {
            eprintln!(
                "There is an error in the configuration file. \
                 You cannot have custom content and weather api set at the same time."
            );
            Ok(String::new())
        }
    }
}

/// One full update pass: resolve the bio, push it, set the status
/// message and fire a local notification.
pub async fn run_update(
    storage: &Storage,
    host: &dyn ProfileHost,
    weather: &dyn WeatherSource,
) -> Result<()> {
    let settings = storage.settings()?;
    let bio = compose_bio(&settings, weather).await?;

    host.update_bio(&bio).await?;
    host.update_status(STATUS_MESSAGE).await?;

    notify("Auto push", "Your GitHub bio has been updated successfully.");
    Ok(())
}

/// Run `op`; on failure, make one best-effort attempt to file a tracking
/// issue and report locally. The error is absorbed, never re-raised.
pub async fn run_reported<F, Fut>(name: &str, host: &dyn ProfileHost, op: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Err(err) = op().await else {
        return;
    };

    let title = format!("Exception in {name}");
    let body = format!("{err}\n\nReported at {}", Utc::now().to_rfc3339());
    if let Err(issue_err) = host.create_issue(&title, &body, &["bug"]).await {
        eprintln!("[ERROR] Failed to create GitHub issue: {issue_err}");
    }

    eprintln!("[ERROR] An error occurred in {name}: {err}");
}
