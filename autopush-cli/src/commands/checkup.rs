//! `autopush checkup` — display secrets and configuration, mutating nothing.

use serde_json::Value;

use autopush_core::{SecretsFile, Storage};

pub fn run(storage: &Storage) -> anyhow::Result<()> {
    let secrets = SecretsFile::in_dir(storage.dir());
    if secrets.exists() {
        match secrets.entries() {
            Ok(entries) => {
                println!("Current secrets file contents:\n");
                print_table(&entries);
            }
            Err(err) => println!("An error occurred while reading secrets: {err}"),
        }
    } else {
        println!("No secrets file found.");
    }

    println!();

    // An unreadable document is reported, never fatal.
    match storage.document() {
        Ok(doc) => {
            let rows: Vec<(String, String)> = doc
                .iter()
                .map(|(key, value)| (key.clone(), render_value(value)))
                .collect();
            println!("Current configuration file contents:\n");
            print_table(&rows);
        }
        Err(err) => println!("An error occurred while reading configuration: {err}"),
    }

    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Activated".to_string(),
        Value::Bool(false) => "Deactivated".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_table(rows: &[(String, String)]) {
    let width = rows
        .iter()
        .map(|(key, _)| key.len())
        .chain(std::iter::once("Key".len()))
        .max()
        .unwrap_or(3);

    println!("{:<width$}  Value", "Key");
    for (key, value) in rows {
        println!("{key:<width$}  {value}");
    }
}
