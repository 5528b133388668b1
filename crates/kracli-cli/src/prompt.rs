//! Interactive credential prompt, used when neither the environment nor
//! the configuration file carries credentials.
//!
//! Prompted credentials are used for the login only and never written
//! to the configuration file.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use kracli_core::auth::Credentials;

/// Prompting is only sensible when a human is attached.
pub fn can_prompt() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Ask for username (stdin) and password (no echo).
pub fn credentials() -> Result<Credentials> {
    eprint!("Username: ");
    io::stderr().flush().context("Failed to flush prompt")?;
    let mut username = String::new();
    io::stdin()
        .lock()
        .read_line(&mut username)
        .context("Failed to read username")?;
    let username = username.trim().to_string();

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    Ok(Credentials { username, password })
}
