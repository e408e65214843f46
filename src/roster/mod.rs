// Customer roster: search, status filter, stats and enrollment
use crate::error::{DeskError, Result};
use crate::models::{Customer, CustomerSubscription, Plan, Subscription};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    /// Customers holding an active subscription
    Active,
    /// Customers without an active subscription
    Expired,
}

fn has_active_subscription(customer: &Customer, subscriptions: &[CustomerSubscription]) -> bool {
    subscriptions
        .iter()
        .any(|cs| cs.subscription.user_id == customer.id && cs.subscription.is_active())
}

fn matches_search(customer: &Customer, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    customer.name.to_lowercase().contains(&needle)
        || customer.email.to_lowercase().contains(&needle)
        || customer.phone.contains(term)
}

/// Customers matching `search` (name, email or phone) and `status`
pub fn filter_customers<'a>(
    customers: &'a [Customer],
    subscriptions: &[CustomerSubscription],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|customer| matches_search(customer, search))
        .filter(|customer| match status {
            StatusFilter::All => true,
            StatusFilter::Active => has_active_subscription(customer, subscriptions),
            StatusFilter::Expired => !has_active_subscription(customer, subscriptions),
        })
        .collect()
}

/// Subscription shown next to a customer in the roster: the active one, else the latest
pub fn current_subscription<'a>(
    customer: &Customer,
    subscriptions: &'a [CustomerSubscription],
) -> Option<&'a CustomerSubscription> {
    let owned = || {
        subscriptions
            .iter()
            .filter(move |cs| cs.subscription.user_id == customer.id)
    };

    owned()
        .find(|cs| cs.subscription.is_active())
        .or_else(|| owned().max_by_key(|cs| cs.subscription.start_date))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

impl RosterStats {
    pub fn compute(customers: &[Customer], subscriptions: &[CustomerSubscription]) -> Self {
        let active = subscriptions
            .iter()
            .filter(|cs| cs.subscription.is_active())
            .count();
        Self {
            total: customers.len(),
            active,
            expired: customers.len().saturating_sub(active),
        }
    }
}

/// Per-field problems with an enrollment form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.fields.push((field, message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Details captured when signing up a new customer
#[derive(Debug, Clone, Default)]
pub struct EnrollmentForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub plan_id: String,
    pub start_date: Option<NaiveDate>,
}

impl EnrollmentForm {
    pub fn validate(&self, plans: &[Plan]) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.add("email", "Email is invalid");
        }
        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone is required");
        }
        if self.plan_id.is_empty() {
            errors.add("plan", "Please select a plan");
        } else {
            match plans.iter().find(|p| p.id == self.plan_id) {
                None => errors.add("plan", "Unknown plan"),
                Some(plan) if plan.duration_days <= 0 => {
                    errors.add("plan", "Plan has no valid duration")
                }
                Some(_) => {}
            }
        }
        if self.start_date.is_none() {
            errors.add("start_date", "Start date is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Validate `form` and build the new customer with an active subscription
pub fn enroll(
    form: EnrollmentForm,
    plans: &[Plan],
    now: DateTime<Utc>,
) -> Result<(Customer, CustomerSubscription)> {
    form.validate(plans)
        .map_err(|errors| DeskError::Validation(errors.to_string()))?;

    // validate() guarantees both of these
    let plan = plans
        .iter()
        .find(|p| p.id == form.plan_id)
        .ok_or_else(|| DeskError::Validation(format!("plan: Unknown plan {}", form.plan_id)))?;
    let start_date = form
        .start_date
        .map(midnight_utc)
        .ok_or_else(|| DeskError::Validation("start_date: Start date is required".to_string()))?;

    let customer = Customer {
        id: format!("customer-{}", uuid::Uuid::new_v4()),
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        address: form.address.filter(|a| !a.trim().is_empty()),
        date_of_birth: form.date_of_birth.map(midnight_utc),
        created_at: now,
    };

    let subscription = Subscription::enroll(
        format!("sub-{}", uuid::Uuid::new_v4()),
        customer.id.clone(),
        plan,
        start_date,
    )
    .ok_or_else(|| {
        DeskError::Validation(format!(
            "plan: {} days from {} is out of range",
            plan.duration_days,
            start_date.date_naive()
        ))
    })?;

    let subscription = CustomerSubscription {
        subscription,
        customer_name: customer.name.clone(),
        plan_name: plan.name.clone(),
        plan_price: plan.price,
    };

    tracing::info!(
        "Enrolled {} on {} ({} days)",
        customer.name,
        plan.name,
        plan.duration_days
    );

    Ok((customer, subscription))
}
