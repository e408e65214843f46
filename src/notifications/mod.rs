// Expiry notifications: generation, inbox and the daily check
pub mod scheduler;

pub use scheduler::SchedulerHandle;

use crate::error::Result;
use crate::expiry;
use crate::models::{NotificationCategory, NotificationRecord, Renewable, Subscription};
use crate::store::{KeyValueStore, Repository};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Day-offset thresholds that produce a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryAlert {
    /// Exactly three days left
    ExpiringSoon,
    /// Exactly one day left
    ExpiresTomorrow,
    /// End date passed less than a day ago
    Expired,
}

impl ExpiryAlert {
    /// Which alert, if any, `subscription` crosses at `now`
    pub fn for_subscription<Tz: TimeZone>(
        subscription: &Subscription,
        now: &DateTime<Tz>,
    ) -> Option<Self> {
        if !subscription.is_active() {
            return None;
        }
        let end = subscription.end_date.as_ref()?;

        if expiry::lapsed_within_day(end, now) {
            return Some(ExpiryAlert::Expired);
        }

        match expiry::days_left(end, now) {
            3 => Some(ExpiryAlert::ExpiringSoon),
            1 => Some(ExpiryAlert::ExpiresTomorrow),
            _ => None,
        }
    }

    /// Id prefix, unique per threshold
    pub fn key(&self) -> &str {
        match self {
            ExpiryAlert::ExpiringSoon => "expiry-warning",
            ExpiryAlert::ExpiresTomorrow => "expiry-critical",
            ExpiryAlert::Expired => "expired",
        }
    }

    pub fn category(&self) -> NotificationCategory {
        match self {
            ExpiryAlert::ExpiringSoon => NotificationCategory::Warning,
            ExpiryAlert::ExpiresTomorrow | ExpiryAlert::Expired => NotificationCategory::Error,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ExpiryAlert::ExpiringSoon => "Plan Expiring Soon",
            ExpiryAlert::ExpiresTomorrow => "Plan Expires Tomorrow",
            ExpiryAlert::Expired => "Plan Expired",
        }
    }

    pub fn notification_id(&self, subscription_id: &str) -> String {
        format!("{}-{}", self.key(), subscription_id)
    }

    fn message(&self, holder: &str, plan: &str) -> String {
        match self {
            ExpiryAlert::ExpiringSoon => format!(
                "{}'s {} plan expires in 3 days. Send a renewal reminder.",
                holder, plan
            ),
            ExpiryAlert::ExpiresTomorrow => format!(
                "{}'s {} plan expires tomorrow. Contact them immediately.",
                holder, plan
            ),
            ExpiryAlert::Expired => format!(
                "{}'s {} plan has expired. Follow up for renewal.",
                holder, plan
            ),
        }
    }

    fn notification<S: Renewable + ?Sized>(&self, item: &S, created_at: DateTime<Utc>) -> NotificationRecord {
        let subscription = item.subscription();
        NotificationRecord {
            id: self.notification_id(&subscription.id),
            user_id: subscription.user_id.clone(),
            title: self.title().to_string(),
            message: self.message(item.holder(), item.plan_label()),
            category: self.category(),
            read: false,
            created_at,
        }
    }
}

/// Build the notifications `items` call for at `now`.
///
/// Only exact thresholds fire, so a subscription yields at most one record
/// per day. Records are new candidates; `Inbox::merge` drops the ones that
/// were already delivered.
pub fn generate<S, Tz>(items: &[S], now: &DateTime<Tz>) -> Vec<NotificationRecord>
where
    S: Renewable,
    Tz: TimeZone,
{
    let created_at = now.with_timezone(&Utc);
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for item in items {
        let Some(alert) = ExpiryAlert::for_subscription(item.subscription(), now) else {
            continue;
        };
        let record = alert.notification(item, created_at);
        if seen.insert(record.id.clone()) {
            records.push(record);
        }
    }

    records
}

/// Persisted notification collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inbox {
    records: Vec<NotificationRecord>,
}

impl Inbox {
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Append records whose id is not already present; returns how many were added
    pub fn merge(&mut self, incoming: Vec<NotificationRecord>) -> usize {
        let mut known: HashSet<String> = self.records.iter().map(|r| r.id.clone()).collect();
        let mut added = 0;

        for record in incoming {
            if known.insert(record.id.clone()) {
                self.records.push(record);
                added += 1;
            } else {
                tracing::trace!("Skipping duplicate notification {}", record.id);
            }
        }

        added
    }

    /// Mark one record read; false when no record has that id
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.read = true;
                true
            }
            None => false,
        }
    }

    /// Drop every record; returns how many were removed
    pub fn clear_all(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    pub fn unread(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.records.iter().filter(|r| !r.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }
}

/// One expiry pass over stored customer subscriptions; returns the number of new records
pub fn check_and_store<S, Tz>(repo: &Repository<S>, now: &DateTime<Tz>) -> Result<usize>
where
    S: KeyValueStore,
    Tz: TimeZone,
{
    let subscriptions = repo.customer_subscriptions()?;
    let candidates = generate(&subscriptions, now);

    let mut inbox = repo.notifications_for_update()?;
    let added = inbox.merge(candidates);

    if added > 0 {
        repo.save_notifications(&inbox)?;
        tracing::info!("Added {} expiry notification(s)", added);
    } else {
        tracing::debug!(
            "Expiry check over {} subscription(s) found nothing new",
            subscriptions.len()
        );
    }

    Ok(added)
}
