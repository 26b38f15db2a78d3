//! Test helpers shared across the flagbind workspace.
//!
//! Binding reads the process environment and resolves config paths against
//! the working directory, so tests that exercise it run inside a
//! [`figment::Jail`], which serialises access and restores both on exit.

use anyhow::{Result, anyhow};
use figment::Jail;

/// Runs `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail starts in a fresh temporary directory and is torn down once the
/// closure completes, even when it fails.
///
/// # Errors
///
/// Returns an error if the jail cannot be initialised or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    let mut output = None;
    Jail::try_with(|j| {
        output = Some(f(j).map_err(|err| figment::Error::from(format!("{err:#}")))?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Like [`with_jail`], but clears the environment first so variables from
/// the host cannot leak into bound options.
///
/// # Errors
///
/// Returns an error if the jail cannot be initialised or the closure fails.
pub fn with_clean_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    with_jail(|j| {
        j.clear_env();
        f(j)
    })
}

/// Sets each `(key, value)` pair in the jail's environment.
pub fn set_envs(jail: &mut Jail, vars: &[(&str, &str)]) {
    for (key, value) in vars {
        jail.set_env(key, value);
    }
}
