use crate::cli::Desk;
use crate::error::Result;

pub fn execute(desk: Desk) -> Result<()> {
    desk.auth().logout()?;

    println!("✓ Logged out successfully");

    Ok(())
}
