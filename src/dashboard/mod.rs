// Dashboard views built from roster and expiry data
use crate::expiry::{self, UrgencyClassification};
use crate::models::{Customer, CustomerSubscription, Plan, Subscription};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// A customer whose active plan ends within the expiring-soon window
#[derive(Debug, Clone)]
pub struct ExpiringEntry<'a> {
    pub customer: &'a Customer,
    pub subscription: &'a CustomerSubscription,
    pub plan: Option<&'a Plan>,
    pub classification: UrgencyClassification,
}

/// Active subscriptions expiring within a week, soonest first.
///
/// Subscriptions whose customer is not on the roster are left out. When
/// `plans` is given, subscriptions on a plan missing from it are left out too.
pub fn expiring_customers<'a, Tz: TimeZone>(
    customers: &'a [Customer],
    subscriptions: &'a [CustomerSubscription],
    plans: Option<&'a [Plan]>,
    now: &DateTime<Tz>,
) -> Vec<ExpiringEntry<'a>> {
    let mut entries: Vec<ExpiringEntry<'a>> = subscriptions
        .iter()
        .filter_map(|cs| {
            let classification = expiry::evaluate(cs, now)?;
            if !classification.is_expiring_soon() {
                return None;
            }

            let customer = customers
                .iter()
                .find(|c| c.id == cs.subscription.user_id)?;

            let plan = match plans {
                Some(plans) => Some(plans.iter().find(|p| p.id == cs.subscription.plan_id)?),
                None => None,
            };

            Some(ExpiringEntry {
                customer,
                subscription: cs,
                plan,
                classification,
            })
        })
        .collect();

    entries.sort_by_key(|e| e.classification.days_left);
    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_customers: usize,
    pub active_subscriptions: usize,
    pub expiring_soon: usize,
}

impl DashboardSummary {
    pub fn compute<Tz: TimeZone>(
        customers: &[Customer],
        subscriptions: &[CustomerSubscription],
        plans: &[Plan],
        now: &DateTime<Tz>,
    ) -> Self {
        Self {
            total_customers: customers.len(),
            active_subscriptions: subscriptions
                .iter()
                .filter(|cs| cs.subscription.is_active())
                .count(),
            expiring_soon: expiring_customers(customers, subscriptions, Some(plans), now).len(),
        }
    }
}

/// The operator's own plan as shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCard {
    pub plan_name: String,
    pub price: String,
    pub days_left: i64,
    pub status_text: String,
    pub expiring_soon: bool,
    pub expired: bool,
}

impl PlanCard {
    /// Renewal button label, when one should be shown
    pub fn call_to_action(&self) -> Option<&str> {
        if self.expired {
            Some("Reactivate Plan")
        } else if self.expiring_soon {
            Some("Renew Now")
        } else {
            None
        }
    }
}

/// Card for the first active subscription whose plan is in the catalog
pub fn plan_card<Tz: TimeZone>(
    subscriptions: &[Subscription],
    plans: &[Plan],
    now: &DateTime<Tz>,
) -> Option<PlanCard> {
    let subscription = subscriptions.iter().find(|s| s.is_active())?;
    let plan = plans.iter().find(|p| p.id == subscription.plan_id)?;
    let end = subscription.end_date.as_ref()?;
    let classification = UrgencyClassification::from_days(expiry::days_left(end, now));

    Some(PlanCard {
        plan_name: plan.name.clone(),
        price: plan.price_display(),
        days_left: classification.days_left,
        status_text: classification.status_text(),
        expiring_soon: classification.days_left <= 3,
        expired: classification.days_left < 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::Urgency;
    use crate::models::SubscriptionStatus;
    use crate::seed;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {}", id),
            email: format!("{}@example.com", id),
            phone: "98450".to_string(),
            address: None,
            date_of_birth: None,
            created_at: now() - Duration::days(30),
        }
    }

    fn ending_in(user_id: &str, days: i64, plan_id: &str) -> CustomerSubscription {
        let end = now() + Duration::days(days);
        CustomerSubscription {
            subscription: Subscription {
                id: format!("sub-{}", user_id),
                user_id: user_id.to_string(),
                plan_id: plan_id.to_string(),
                start_date: end - Duration::days(30),
                end_date: Some(end),
                status: SubscriptionStatus::Active,
                auto_renew: false,
            },
            customer_name: user_id.to_string(),
            plan_name: plan_id.to_string(),
            plan_price: 80,
        }
    }

    #[test]
    fn test_expiring_customers_sorted_and_windowed() {
        let customers: Vec<Customer> = ["a", "b", "c", "d", "e"].into_iter().map(customer).collect();
        let subs = vec![
            ending_in("a", 7, "monthly-basic"),
            ending_in("b", 8, "monthly-basic"),
            ending_in("c", -2, "monthly-basic"),
            ending_in("d", 1, "monthly-basic"),
            ending_in("ghost", 2, "monthly-basic"),
        ];

        let entries = expiring_customers(&customers, &subs, None, &now());
        let ids: Vec<&str> = entries.iter().map(|e| e.customer.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a"]);
        assert_eq!(entries[0].classification.urgency, Urgency::Expired);
        assert!(entries.iter().all(|e| e.plan.is_none()));
    }

    #[test]
    fn test_expiring_customers_requires_known_plan_when_plans_given() {
        let customers = vec![customer("a"), customer("b")];
        let subs = vec![
            ending_in("a", 2, "monthly-basic"),
            ending_in("b", 2, "retired-plan"),
        ];
        let plans = seed::plans();

        let entries = expiring_customers(&customers, &subs, Some(plans.as_slice()), &now());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].plan.map(|p| p.name.as_str()), Some("Monthly Commuter"));
    }

    #[test]
    fn test_cancelled_subscriptions_are_not_expiring() {
        let customers = vec![customer("a")];
        let mut sub = ending_in("a", 2, "monthly-basic");
        sub.subscription.status = SubscriptionStatus::Cancelled;

        assert!(expiring_customers(&customers, &[sub], None, &now()).is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let customers = vec![customer("a"), customer("b"), customer("c")];
        let mut cancelled = ending_in("c", 1, "monthly-basic");
        cancelled.subscription.status = SubscriptionStatus::Cancelled;
        let subs = vec![
            ending_in("a", 3, "monthly-basic"),
            ending_in("b", 20, "monthly-basic"),
            cancelled,
        ];

        let summary = DashboardSummary::compute(&customers, &subs, &seed::plans(), &now());
        assert_eq!(
            summary,
            DashboardSummary {
                total_customers: 3,
                active_subscriptions: 2,
                expiring_soon: 1,
            }
        );
    }

    #[test]
    fn test_plan_card_states() {
        let plans = seed::plans();
        let mut sub = ending_in("1", 2, "weekly-premium").subscription;

        let card = plan_card(std::slice::from_ref(&sub), &plans, &now()).unwrap();
        assert_eq!(card.plan_name, "Weekly Premium");
        assert_eq!(card.status_text, "2 days left");
        assert_eq!(card.call_to_action(), Some("Renew Now"));

        sub.end_date = Some(now() - Duration::days(1));
        let card = plan_card(std::slice::from_ref(&sub), &plans, &now()).unwrap();
        assert!(card.expired);
        assert_eq!(card.call_to_action(), Some("Reactivate Plan"));

        sub.end_date = Some(now() + Duration::days(10));
        let card = plan_card(std::slice::from_ref(&sub), &plans, &now()).unwrap();
        assert_eq!(card.call_to_action(), None);

        sub.status = SubscriptionStatus::Cancelled;
        assert!(plan_card(&[sub], &plans, &now()).is_none());
    }
}
