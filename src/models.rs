use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The operator using the desk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Apply a partial profile update, leaving unset fields untouched
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
    }
}

/// Typed partial update for the operator profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.avatar.is_none()
    }
}

/// Battery-swap station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BikeStation {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available_bikes: u32,
    pub total_bikes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl BikeStation {
    pub fn availability_display(&self) -> String {
        format!("{}/{}", self.available_bikes, self.total_bikes)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BikeKind {
    Electric,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: BikeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    pub station_id: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Weekly,
    Monthly,
}

impl PlanKind {
    pub fn as_str(&self) -> &str {
        match self {
            PlanKind::Weekly => "weekly",
            PlanKind::Monthly => "monthly",
        }
    }
}

/// Rental plan from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlanKind,
    pub price: u32,
    /// Length of the plan in days
    #[serde(rename = "duration")]
    pub duration_days: i64,
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl Plan {
    pub fn price_display(&self) -> String {
        format!("₹{}/{}", self.price, self.kind.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Expired => "EXPIRED",
            SubscriptionStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Owning customer
    pub user_id: String,
    pub plan_id: String,
    pub start_date: DateTime<Utc>,
    /// `None` when the stored value is missing or unparseable
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    pub status: SubscriptionStatus,
    pub auto_renew: bool,
}

impl Subscription {
    /// Start a new active subscription for `plan`.
    ///
    /// `None` when the plan length is not positive or the end date would
    /// fall outside the representable range.
    pub fn enroll(id: String, user_id: String, plan: &Plan, start_date: DateTime<Utc>) -> Option<Self> {
        if plan.duration_days <= 0 {
            return None;
        }
        let end_date = start_date.checked_add_signed(Duration::try_days(plan.duration_days)?)?;

        Some(Self {
            id,
            user_id,
            plan_id: plan.id.clone(),
            start_date,
            end_date: Some(end_date),
            status: SubscriptionStatus::Active,
            auto_renew: false,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// End date strictly after start date
    pub fn has_valid_period(&self) -> bool {
        self.end_date.map(|end| end > self.start_date).unwrap_or(false)
    }
}

/// Subscription as stored by enrollment, with the names the views display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSubscription {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub customer_name: String,
    pub plan_name: String,
    pub plan_price: u32,
}

/// Anything that carries a subscription the expiry logic can look at
pub trait Renewable {
    fn subscription(&self) -> &Subscription;

    /// Who the subscription belongs to, for messages
    fn holder(&self) -> &str {
        &self.subscription().user_id
    }

    fn plan_label(&self) -> &str {
        &self.subscription().plan_id
    }
}

impl Renewable for Subscription {
    fn subscription(&self) -> &Subscription {
        self
    }
}

impl Renewable for CustomerSubscription {
    fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    fn holder(&self) -> &str {
        &self.customer_name
    }

    fn plan_label(&self) -> &str {
        &self.plan_name
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub user_id: String,
    pub bike_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub start_station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_station: Option<String>,
    pub cost: u32,
    pub status: RentalStatus,
}

impl Rental {
    /// Ride length in whole minutes, 0 while the ride is still open
    pub fn duration_minutes(&self) -> i64 {
        self.end_time
            .map(|end| (end - self.start_time).num_minutes())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationCategory::Info => "INFO",
            NotificationCategory::Warning => "WARNING",
            NotificationCategory::Success => "SUCCESS",
            NotificationCategory::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub category: NotificationCategory,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = raw.as_ref().and_then(|value| value.as_str()).and_then(|text| {
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    });

    if raw.is_some() && parsed.is_none() {
        tracing::warn!("Ignoring unparseable timestamp: {:?}", raw);
    }

    Ok(parsed)
}
