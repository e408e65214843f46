use crate::cli::{parse_date, CustomerCommand, Desk};
use crate::error::Result;
use crate::expiry;
use crate::roster::{self, EnrollmentForm, RosterStats, StatusFilter};
use chrono::{Local, Utc};
use serde_json::json;

pub fn execute(desk: &Desk, command: CustomerCommand) -> Result<()> {
    match command {
        CustomerCommand::List {
            search,
            status,
            json,
        } => list(desk, search.as_deref().unwrap_or(""), status, json),
        CustomerCommand::Add {
            name,
            email,
            phone,
            address,
            dob,
            plan,
            start_date,
        } => {
            let start_date = match start_date {
                Some(raw) => parse_date(&raw)?,
                None => Local::now().date_naive(),
            };
            let form = EnrollmentForm {
                name,
                email,
                phone,
                address,
                date_of_birth: dob.as_deref().map(parse_date).transpose()?,
                plan_id: plan,
                start_date: Some(start_date),
            };
            add(desk, form)
        }
    }
}

fn list(desk: &Desk, search: &str, status: StatusFilter, json: bool) -> Result<()> {
    let now = Local::now();
    let customers = desk.repo.customers()?;
    let subscriptions = desk.repo.customer_subscriptions()?;
    let matches = roster::filter_customers(&customers, &subscriptions, search, status);

    if json {
        let rows: Vec<_> = matches
            .iter()
            .map(|customer| {
                let current = roster::current_subscription(customer, &subscriptions);
                json!({
                    "customer": customer,
                    "subscription": current,
                    "daysLeft": current
                        .and_then(|cs| cs.subscription.end_date.as_ref())
                        .map(|end| expiry::days_left(end, &now)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let stats = RosterStats::compute(&customers, &subscriptions);
    println!(
        "Total: {}   Active: {}   Expired: {}\n",
        stats.total, stats.active, stats.expired
    );

    if matches.is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    for customer in matches {
        println!("  {}  {}  {}", customer.name, customer.email, customer.phone);

        match roster::current_subscription(customer, &subscriptions) {
            Some(cs) => {
                let remaining = cs
                    .subscription
                    .end_date
                    .map(|end| expiry::format_time_remaining(&end, &now))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "      {} ₹{}  {}  {}",
                    cs.plan_name,
                    cs.plan_price,
                    cs.subscription.status.as_str(),
                    remaining
                );
            }
            None => println!("      No plan"),
        }
    }

    Ok(())
}

fn add(desk: &Desk, form: EnrollmentForm) -> Result<()> {
    let plans = desk.repo.plans()?;
    let (customer, subscription) = roster::enroll(form, &plans, Utc::now())?;
    let summary = format!("{} ({}) on {}", customer.name, customer.id, subscription.plan_name);

    let ends = subscription
        .subscription
        .end_date
        .map(|end| end.format("%b %d, %Y").to_string())
        .unwrap_or_default();

    desk.repo.add_customer(customer, subscription)?;
    println!("✓ Added {}, ends {}", summary, ends);
    Ok(())
}
