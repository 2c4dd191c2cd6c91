//! `autopush stop` — remove every tagged cron job.

use autopush_core::{Scheduler, Storage};

pub fn run(storage: &Storage, scheduler: &dyn Scheduler) -> anyhow::Result<()> {
    let removed = scheduler.remove_tagged()?;
    storage.set("github_cron_tab", false)?;

    if removed > 0 {
        println!("All scheduled jobs have been removed successfully.");
    } else {
        println!("No scheduled job was registered.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopush_core::{Result, Schedule};
    use std::sync::Mutex;

    /// In-memory stand-in for the user's crontab.
    #[derive(Default)]
    struct FakeScheduler {
        entries: Mutex<Vec<String>>,
    }

    impl Scheduler for FakeScheduler {
        fn install(&self, schedule: &Schedule, command: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .push(format!("{} {}", schedule.fields(), command));
            Ok(())
        }

        fn remove_tagged(&self) -> Result<usize> {
            let mut entries = self.entries.lock().unwrap();
            let removed = entries.len();
            entries.clear();
            Ok(removed)
        }

        fn is_registered(&self) -> Result<bool> {
            Ok(!self.entries.lock().unwrap().is_empty())
        }
    }

    #[test]
    fn stop_clears_jobs_and_flag() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        storage.init().unwrap();
        storage.set("github_cron_tab", true).unwrap();

        let scheduler = FakeScheduler::default();
        scheduler
            .install(&Schedule::new(0, 6, 1, 1), "/bin/autopush update")
            .unwrap();

        run(&storage, &scheduler).unwrap();

        assert!(!scheduler.is_registered().unwrap());
        assert_eq!(
            storage.get("github_cron_tab").unwrap(),
            Some(serde_json::Value::Bool(false))
        );
    }

    #[test]
    fn stop_without_jobs_still_clears_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        storage.init().unwrap();

        let scheduler = FakeScheduler::default();
        run(&storage, &scheduler).unwrap();

        assert_eq!(
            storage.get("github_cron_tab").unwrap(),
            Some(serde_json::Value::Bool(false))
        );
    }
}
