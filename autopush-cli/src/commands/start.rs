//! `autopush start` — configure the bio source and register the cron job.

use serde_json::Value;

use autopush_core::{Schedule, Scheduler, Storage};

use crate::commands::update;

pub async fn run(
    storage: &Storage,
    scheduler: &dyn Scheduler,
    content: Option<&str>,
    schedule: Schedule,
) -> anyhow::Result<()> {
    let user_job = storage.get("github_cron_tab")?;
    storage.set_bio_mode(content)?;

    match user_job {
        // No job yet: register it and push the first update right away.
        None | Some(Value::Bool(false)) => {
            register_and_run(storage, scheduler, &schedule).await?;
            storage.set("github_cron_tab", true)?;
            println!("GitHub bio update has been set successfully.");
        }

        // Already active: replace only on explicit confirmation.
        Some(Value::Bool(true)) => {
            println!("GitHub bio update is already set up.");
            let reset = inquire::Confirm::new("Do you want to reset it?")
                .with_default(false)
                .prompt()?;
            if reset {
                scheduler.remove_tagged()?;
                register_and_run(storage, scheduler, &schedule).await?;
                println!("GitHub bio update has been reset successfully.");
            }
        }

        // The flag holds something that is not a boolean: the document
        // drifted, reset the managed options.
        Some(other) => {
            eprintln!(
                "An error occurred in your configuration file \
                 (github_cron_tab = {other}). Resetting CLI configuration..."
            );
            storage.repair()?;
            println!("CLI configuration has been reset successfully.");
        }
    }

    Ok(())
}

async fn register_and_run(
    storage: &Storage,
    scheduler: &dyn Scheduler,
    schedule: &Schedule,
) -> anyhow::Result<()> {
    let exe = std::env::current_exe()?;
    scheduler.install(schedule, &format!("{} update", exe.display()))?;

    // Run one update immediately so the bio does not wait for cron.
    update::run(storage).await
}
