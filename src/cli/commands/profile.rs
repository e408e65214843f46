use crate::cli::{Desk, ProfileCommand};
use crate::error::{DeskError, Result};
use crate::models::UserUpdate;
use chrono::Local;

pub fn execute(desk: &Desk, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Show => show(desk),
        ProfileCommand::Edit {
            name,
            email,
            phone,
            avatar,
        } => {
            let update = UserUpdate {
                name,
                email,
                phone,
                avatar,
            };
            if update.is_empty() {
                return Err(DeskError::Validation(
                    "Nothing to update, pass at least one field".to_string(),
                ));
            }

            let mut user = desk.repo.user_for_update()?;
            user.apply(update);
            desk.repo.save_user(&user)?;
            println!("✓ Profile updated");
            Ok(())
        }
    }
}

fn show(desk: &Desk) -> Result<()> {
    let user = desk.repo.user()?;
    println!("{}", user.name);
    println!("  Email: {}", user.email);
    println!("  Phone: {}", user.phone);

    let rentals: Vec<_> = desk
        .repo
        .rentals()?
        .into_iter()
        .filter(|r| r.user_id == user.id)
        .collect();

    println!("\nRide history:");
    if rentals.is_empty() {
        println!("  No rides yet.");
        return Ok(());
    }

    for rental in &rentals {
        println!(
            "  {}  {} min  ₹{}  {:?}  from {}{}",
            rental.start_time.with_timezone(&Local).format("%b %d, %Y %H:%M"),
            rental.duration_minutes(),
            rental.cost,
            rental.status,
            rental.start_station,
            rental
                .end_station
                .as_ref()
                .map(|s| format!(" to {}", s))
                .unwrap_or_default()
        );
    }

    Ok(())
}
