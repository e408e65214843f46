use crate::cli::Desk;
use crate::dashboard::{self, DashboardSummary};
use crate::error::Result;
use chrono::Local;
use serde_json::json;

pub fn execute(desk: &Desk, json: bool) -> Result<()> {
    let now = Local::now();
    let customers = desk.repo.customers()?;
    let subscriptions = desk.repo.customer_subscriptions()?;
    let plans = desk.repo.plans()?;
    let own_subscriptions = desk.repo.subscriptions()?;

    let summary = DashboardSummary::compute(&customers, &subscriptions, &plans, &now);
    let expiring = dashboard::expiring_customers(&customers, &subscriptions, Some(&plans), &now);
    let card = dashboard::plan_card(&own_subscriptions, &plans, &now);

    if json {
        let entries: Vec<_> = expiring
            .iter()
            .map(|entry| {
                json!({
                    "customerId": entry.customer.id,
                    "customerName": entry.customer.name,
                    "phone": entry.customer.phone,
                    "subscriptionId": entry.subscription.subscription.id,
                    "planName": entry.subscription.plan_name,
                    "planPrice": entry.subscription.plan_price,
                    "endDate": entry.subscription.subscription.end_date,
                    "daysLeft": entry.classification.days_left,
                    "urgency": entry.classification.urgency.as_str(),
                })
            })
            .collect();

        let output = json!({
            "summary": summary,
            "planCard": card,
            "expiring": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Customers: {}   Active plans: {}   Expiring soon: {}\n",
        summary.total_customers, summary.active_subscriptions, summary.expiring_soon
    );

    if let Some(card) = &card {
        print!(
            "Your plan: {} ({}) - {}",
            card.plan_name, card.price, card.status_text
        );
        match card.call_to_action() {
            Some(action) => println!("  [{}]", action),
            None => println!(),
        }
        println!();
    }

    if expiring.is_empty() {
        println!("No plans expiring in the next 7 days.");
        return Ok(());
    }

    println!("Plans expiring soon:\n");
    for entry in &expiring {
        let expires = entry
            .subscription
            .subscription
            .end_date
            .map(|end| end.with_timezone(&Local).format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        println!(
            "  {} ({})  [{}]",
            entry.customer.name,
            entry.customer.phone,
            entry.classification.status_text()
        );
        println!(
            "    {} ₹{}  Expires: {}",
            entry.subscription.plan_name, entry.subscription.plan_price, expires
        );
        println!("    {}", entry.classification.advice());
    }

    Ok(())
}
