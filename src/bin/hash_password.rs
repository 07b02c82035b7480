//! Prints an argon2 hash for `APP_ADMIN_PASSWORD_HASH`.
//!
//! Usage: `hash-password <password>`, or pipe the password on stdin.

use std::io::{self, BufRead};

use anyhow::{bail, Context};
use portfolio_site::auth::password::hash_password;
use zeroize::Zeroizing;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(arg) => Zeroizing::new(arg),
        None => {
            let mut line = Zeroizing::new(String::new());
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string())
        }
    };

    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("{}", hash);
    Ok(())
}
