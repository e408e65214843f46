use crate::cli::Desk;
use crate::error::Result;

pub fn execute(desk: Desk, username: &str, password: &str) -> Result<()> {
    desk.auth().login(username, password)?;

    println!("✓ Logged in as {}", username.trim());

    Ok(())
}
