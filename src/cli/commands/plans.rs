use crate::cli::Desk;
use crate::error::Result;
use crate::expiry;
use crate::models::{Plan, PlanKind};

/// One-time charge collected when a customer is onboarded
const SERVICE_CHARGE: u32 = 500;

pub fn execute(desk: &Desk, json: bool) -> Result<()> {
    let plans = desk.repo.plans()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    let active = desk.repo.subscriptions()?.into_iter().find(|s| s.is_active());
    let active_plan_id = active.as_ref().map(|s| s.plan_id.clone());

    if let Some(classification) = active.as_ref().and_then(expiry::evaluate_now) {
        println!("Current plan: {}\n", classification.status_text());
    }

    println!(
        "₹{} one-time service charge applies during customer onboarding.\n",
        SERVICE_CHARGE
    );

    for (heading, kind) in [("Weekly plans", PlanKind::Weekly), ("Monthly plans", PlanKind::Monthly)] {
        println!("{}:", heading);
        for plan in plans.iter().filter(|p| p.kind == kind) {
            print_plan(plan, active_plan_id.as_deref() == Some(plan.id.as_str()));
        }
        println!();
    }

    Ok(())
}

fn print_plan(plan: &Plan, is_active: bool) {
    let mut tags = Vec::new();
    if plan.popular {
        tags.push("POPULAR");
    }
    if is_active {
        tags.push("CURRENT");
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    };

    println!(
        "  {} ({}) - {}, {} days{}",
        plan.name,
        plan.id,
        plan.price_display(),
        plan.duration_days,
        tags
    );
    for feature in &plan.features {
        println!("      • {}", feature);
    }
}
