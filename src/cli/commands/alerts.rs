use crate::cli::{AlertCommand, Desk};
use crate::error::Result;
use crate::models::NotificationRecord;
use crate::notifications;
use chrono::Local;

pub fn execute(desk: &Desk, command: AlertCommand) -> Result<()> {
    match command {
        AlertCommand::List { unread, json } => list(desk, unread, json),
        AlertCommand::Check => {
            let added = notifications::check_and_store(&desk.repo, &Local::now())?;
            if added == 0 {
                println!("No new alerts.");
            } else {
                println!("✓ {} new alert(s)", added);
            }
            Ok(())
        }
        AlertCommand::Read { id } => {
            let mut inbox = desk.repo.notifications_for_update()?;
            if inbox.mark_read(&id) {
                desk.repo.save_notifications(&inbox)?;
                println!("✓ Marked {} as read", id);
            } else {
                println!("No alert with id {}", id);
            }
            Ok(())
        }
        AlertCommand::Clear => {
            let mut inbox = desk.repo.notifications_for_update()?;
            let removed = inbox.clear_all();
            desk.repo.save_notifications(&inbox)?;
            println!("✓ Cleared {} alert(s)", removed);
            Ok(())
        }
    }
}

fn list(desk: &Desk, unread_only: bool, json: bool) -> Result<()> {
    let inbox = desk.repo.notifications()?;
    let records: Vec<&NotificationRecord> = if unread_only {
        inbox.unread().collect()
    } else {
        inbox.records().iter().collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No alerts.");
        return Ok(());
    }

    println!("{} alert(s), {} unread\n", inbox.len(), inbox.unread_count());
    for record in records {
        let marker = if record.read { " " } else { "*" };
        println!(
            "{} [{}] {}  ({})",
            marker,
            record.category.as_str(),
            record.title,
            record.created_at.with_timezone(&Local).format("%b %d %H:%M")
        );
        println!("    {}", record.message);
        println!("    id: {}", record.id);
    }

    Ok(())
}
