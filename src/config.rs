//! Where the CLI keeps its session between invocations.

use std::path::{Path, PathBuf};

pub const STATE_FILE_ENV: &str = "ISDSTORE_STATE_FILE";

/// `$HOME/.config/isdstore/session.json`, falling back to `USERPROFILE` and
/// finally to `.isdstore/session.json` under the working directory.
#[must_use]
pub fn default_state_file() -> PathBuf {
    let home = std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var_os("USERPROFILE").filter(|v| !v.is_empty()));
    match home {
        Some(home) => state_file_under(Path::new(&home)),
        None => PathBuf::from(".isdstore").join("session.json"),
    }
}

fn state_file_under(home: &Path) -> PathBuf {
    home.join(".config").join("isdstore").join("session.json")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
