//! `autopush setup` — append a credential to the secrets file.

use autopush_core::{Error, SecretKind, SecretsFile, Storage};

pub fn run(storage: &Storage, key: u8, value: &str) -> anyhow::Result<()> {
    let Some(kind) = SecretKind::from_key(key) else {
        return Err(Error::InvalidArgument(format!(
            "{key} is not a valid configuration key (expected 1 or 2)"
        ))
        .into());
    };

    let secrets = SecretsFile::in_dir(storage.dir());
    secrets.append(kind, value)?;

    // A weather key implies the weather bio mode.
    if kind == SecretKind::WeatherKey {
        storage.set("weather_api", true)?;
    }

    println!("{} has been set up successfully.", kind.var_name());
    Ok(())
}
