//! `autopush update` — the scheduled-job body.
//!
//! Runs non-interactively under cron. The whole update is wrapped by
//! the error-reporting adapter, so this command always exits 0; failures
//! become a best-effort tracking issue plus a local message.

use autopush_core::{GithubClient, SecretsFile, Storage, WeatherApiClient, updater};

pub async fn run(storage: &Storage) -> anyhow::Result<()> {
    let secrets = SecretsFile::in_dir(storage.dir());
    if let Err(err) = secrets.load_into_env() {
        tracing::warn!("failed to load secrets file: {err}");
    }

    let github = GithubClient::from_env();
    let weather = WeatherApiClient::from_env();

    updater::run_reported("updater", &github, || {
        updater::run_update(storage, &github, &weather)
    })
    .await;

    Ok(())
}
