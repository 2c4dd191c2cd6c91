use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Marker appended to every entry this tool owns, rendered as a trailing
/// shell comment so cron still runs the command unchanged.
pub const JOB_TAG: &str = "1";

/// Cron schedule fields. Out-of-range input falls back to a sane value
/// instead of failing: minute 0, hour 6, day 1, month 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
}

impl Schedule {
    pub fn new(minute: u32, hour: u32, day: u32, month: u32) -> Self {
        Self {
            minute: if minute <= 59 { minute } else { 0 },
            hour: if hour <= 23 { hour } else { 6 },
            day: if (1..=31).contains(&day) { day } else { 1 },
            month: if (1..=12).contains(&month) { month } else { 1 },
        }
    }

    /// The five cron time fields; day-of-week is always `*`.
    pub fn fields(&self) -> String {
        format!("{} {} {} {} *", self.minute, self.hour, self.day, self.month)
    }
}

/// OS-level periodic job registration, behind a trait so the command
/// layer is testable without touching the user's real crontab.
pub trait Scheduler {
    /// Append one tagged entry running `command` on `schedule`.
    fn install(&self, schedule: &Schedule, command: &str) -> Result<()>;

    /// Remove every tagged entry; returns how many were removed.
    fn remove_tagged(&self) -> Result<usize>;

    /// Whether at least one tagged entry exists.
    fn is_registered(&self) -> Result<bool>;
}

/// Render one tagged crontab line.
fn entry_line(schedule: &Schedule, command: &str) -> String {
    format!("{} {} # {}", schedule.fields(), command, JOB_TAG)
}

/// Whether a crontab line is one of ours: a job entry (five time fields
/// plus a command, not a comment or variable line) whose trailing shell
/// comment is exactly the tag.
fn is_tagged(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return false;
    }

    let Some((entry, comment)) = trimmed.rsplit_once(" # ") else {
        return false;
    };

    comment == JOB_TAG && entry.split_whitespace().count() >= 6
}

/// Drop tagged lines from a crontab text, preserving everything else.
fn strip_tagged(text: &str) -> (String, usize) {
    let mut kept = Vec::new();
    let mut removed = 0;

    for line in text.lines() {
        if is_tagged(line) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }

    let mut out = kept.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    (out, removed)
}

fn append_entry(text: &str, schedule: &Schedule, command: &str) -> String {
    let mut out = text.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&entry_line(schedule, command));
    out.push('\n');
    out
}

/// Scheduler backed by the current user's crontab, via `crontab -l` /
/// `crontab -`.
#[derive(Debug, Clone, Default)]
pub struct CrontabScheduler;

impl CrontabScheduler {
    fn read(&self) -> Result<String> {
        let output = Command::new("crontab")
            .arg("-l")
            .output()
            .map_err(|e| Error::Cron(format!("failed to run crontab -l: {e}")))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        // An empty crontab is reported as an error by most cron
        // implementations; treat it as an empty table.
        if stderr.contains("no crontab") {
            Ok(String::new())
        } else {
            Err(Error::Cron(format!("crontab -l failed: {}", stderr.trim())))
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut child = Command::new("crontab")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Cron(format!("failed to run crontab -: {e}")))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| Error::Cron(format!("failed to write crontab: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Cron(format!("failed to wait for crontab: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Cron(format!("crontab rejected input: {}", stderr.trim())));
        }

        Ok(())
    }
}

impl Scheduler for CrontabScheduler {
    fn install(&self, schedule: &Schedule, command: &str) -> Result<()> {
        let current = self.read()?;
        self.write(&append_entry(&current, schedule, command))
    }

    fn remove_tagged(&self) -> Result<usize> {
        let current = self.read()?;
        let (kept, removed) = strip_tagged(&current);
        if removed > 0 {
            self.write(&kept)?;
        }
        Ok(removed)
    }

    fn is_registered(&self) -> Result<bool> {
        Ok(self.read()?.lines().any(is_tagged))
    }
}
