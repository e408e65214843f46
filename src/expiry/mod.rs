// Subscription expiry classification
use crate::models::Renewable;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};

/// Subscriptions this many days out or closer count as "expiring soon"
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// How pressing a subscription's renewal is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
    Expired,
    DueToday,
    /// One day left
    Critical,
    /// Two or three days left
    Warning,
    /// Four to seven days left
    Normal,
    /// More than a week left, not shown in expiry views
    Clear,
}

impl Urgency {
    /// First match wins, in declaration order
    pub fn from_days(days_left: i64) -> Self {
        if days_left < 0 {
            Urgency::Expired
        } else if days_left == 0 {
            Urgency::DueToday
        } else if days_left == 1 {
            Urgency::Critical
        } else if days_left <= 3 {
            Urgency::Warning
        } else if days_left <= EXPIRING_SOON_DAYS {
            Urgency::Normal
        } else {
            Urgency::Clear
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Urgency::Expired => "EXPIRED",
            Urgency::DueToday => "DUE TODAY",
            Urgency::Critical => "CRITICAL",
            Urgency::Warning => "WARNING",
            Urgency::Normal => "NORMAL",
            Urgency::Clear => "CLEAR",
        }
    }

    pub fn is_expiring_soon(&self) -> bool {
        *self != Urgency::Clear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyClassification {
    pub urgency: Urgency,
    /// Whole calendar days until the end date, negative once it has passed
    pub days_left: i64,
}

impl UrgencyClassification {
    pub fn from_days(days_left: i64) -> Self {
        Self {
            urgency: Urgency::from_days(days_left),
            days_left,
        }
    }

    pub fn is_expiring_soon(&self) -> bool {
        self.urgency.is_expiring_soon()
    }

    /// Badge text for lists and cards
    pub fn status_text(&self) -> String {
        match self.days_left {
            d if d < 0 => "Expired".to_string(),
            0 => "Expires Today".to_string(),
            1 => "1 day left".to_string(),
            d => format!("{} days left", d),
        }
    }

    /// What the desk should do about it
    pub fn advice(&self) -> String {
        match self.urgency {
            Urgency::Expired => "Plan has expired! Contact customer for renewal.".to_string(),
            Urgency::DueToday => "Plan expires today! Urgent renewal required.".to_string(),
            Urgency::Critical => {
                "Plan expires in 1 day! Contact customer immediately.".to_string()
            }
            Urgency::Warning | Urgency::Normal => format!(
                "Contact customer for plan renewal in {} days.",
                self.days_left
            ),
            Urgency::Clear => "No action needed.".to_string(),
        }
    }
}

/// Whole calendar days from `now` to `end`, rounded down.
///
/// Both instants are compared as wall-clock times in `now`'s timezone, so
/// "3 days" is the same clock time three calendar days out even across a
/// DST change.
pub fn days_left<Tz: TimeZone>(end: &DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let diff = wall_clock_diff(end, now);
    let whole = diff.num_days();
    if diff < Duration::days(whole) {
        whole - 1
    } else {
        whole
    }
}

/// True when `end` passed less than one calendar day ago
pub fn lapsed_within_day<Tz: TimeZone>(end: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let diff = wall_clock_diff(end, now);
    diff < Duration::zero() && diff > -Duration::days(1)
}

fn wall_clock_diff<Tz: TimeZone>(end: &DateTime<Utc>, now: &DateTime<Tz>) -> Duration {
    let end_local = end.with_timezone(&now.timezone()).naive_local();
    end_local - now.naive_local()
}

/// Classify an active subscription's expiry.
///
/// Returns `None` for subscriptions that are not active, and for records
/// whose end date is missing or unparseable. A bad record is logged and
/// left out rather than failing the whole view.
pub fn evaluate<S, Tz>(item: &S, now: &DateTime<Tz>) -> Option<UrgencyClassification>
where
    S: Renewable + ?Sized,
    Tz: TimeZone,
{
    let subscription = item.subscription();
    if !subscription.is_active() {
        return None;
    }

    let Some(end) = subscription.end_date.as_ref() else {
        tracing::warn!(
            "Subscription {} has no usable end date, leaving it unclassified",
            subscription.id
        );
        return None;
    };
    if !subscription.has_valid_period() {
        tracing::warn!("Subscription {} ends on or before its start date", subscription.id);
    }

    Some(UrgencyClassification::from_days(days_left(end, now)))
}

/// `evaluate` against the local wall clock
pub fn evaluate_now<S: Renewable + ?Sized>(item: &S) -> Option<UrgencyClassification> {
    evaluate(item, &Local::now())
}

/// Compact countdown for detail views ("2d 4h", "3h 12m", "45m")
pub fn format_time_remaining<Tz: TimeZone>(end: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let now_utc = now.with_timezone(&Utc);
    if *end <= now_utc {
        return "EXPIRED".to_string();
    }

    let minutes_total = (*end - now_utc).num_minutes();
    let days = minutes_total / (24 * 60);
    let hours = (minutes_total % (24 * 60)) / 60;
    let minutes = minutes_total % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subscription, SubscriptionStatus};
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn subscription(end: Option<DateTime<Utc>>, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: "S1".to_string(),
            user_id: "c-1".to_string(),
            plan_id: "weekly-basic".to_string(),
            start_date: utc(2023, 12, 1, 0),
            end_date: end,
            status,
            auto_renew: false,
        }
    }

    #[test]
    fn test_three_days_out_is_warning() {
        let now = utc(2024, 1, 1, 0);
        let sub = subscription(Some(utc(2024, 1, 4, 0)), SubscriptionStatus::Active);

        let class = evaluate(&sub, &now).unwrap();
        assert_eq!(class.urgency, Urgency::Warning);
        assert_eq!(class.days_left, 3);
        assert_eq!(class.status_text(), "3 days left");
    }

    #[test]
    fn test_precedence_by_days() {
        assert_eq!(Urgency::from_days(-5), Urgency::Expired);
        assert_eq!(Urgency::from_days(-1), Urgency::Expired);
        assert_eq!(Urgency::from_days(0), Urgency::DueToday);
        assert_eq!(Urgency::from_days(1), Urgency::Critical);
        assert_eq!(Urgency::from_days(2), Urgency::Warning);
        assert_eq!(Urgency::from_days(3), Urgency::Warning);
        assert_eq!(Urgency::from_days(4), Urgency::Normal);
        assert_eq!(Urgency::from_days(7), Urgency::Normal);
        assert_eq!(Urgency::from_days(8), Urgency::Clear);
    }

    #[test]
    fn test_expiring_soon_boundary() {
        assert!(UrgencyClassification::from_days(7).is_expiring_soon());
        assert!(!UrgencyClassification::from_days(8).is_expiring_soon());
        assert!(UrgencyClassification::from_days(-2).is_expiring_soon());
    }

    #[test]
    fn test_past_end_date_is_expired() {
        let now = utc(2024, 1, 10, 12);
        for end in [utc(2024, 1, 10, 11), utc(2024, 1, 9, 12), utc(2023, 6, 1, 0)] {
            let sub = subscription(Some(end), SubscriptionStatus::Active);
            let class = evaluate(&sub, &now).unwrap();
            assert_eq!(class.urgency, Urgency::Expired, "end {}", end);
            assert!(class.days_left < 0);
        }
    }

    #[test]
    fn test_days_left_floors_partial_days() {
        let now = utc(2024, 1, 1, 10);
        assert_eq!(days_left(&utc(2024, 1, 4, 9), &now), 2);
        assert_eq!(days_left(&utc(2024, 1, 4, 10), &now), 3);
        assert_eq!(days_left(&utc(2024, 1, 1, 11), &now), 0);
        assert_eq!(days_left(&utc(2024, 1, 1, 9), &now), -1);
        assert_eq!(days_left(&utc(2023, 12, 31, 10), &now), -1);
        assert_eq!(days_left(&utc(2023, 12, 31, 9), &now), -2);
    }

    #[test]
    fn test_days_left_uses_now_timezone_calendar() {
        // 23:00 on Jan 1 in UTC+5 is still Jan 1 18:00 UTC
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let end = utc(2024, 1, 4, 18);
        assert_eq!(days_left(&end, &now), 3);
    }

    #[test]
    fn test_lapsed_within_day() {
        let now = utc(2024, 1, 2, 6);
        assert!(lapsed_within_day(&utc(2024, 1, 2, 5), &now));
        assert!(lapsed_within_day(&utc(2024, 1, 1, 7), &now));
        assert!(!lapsed_within_day(&utc(2024, 1, 1, 6), &now));
        assert!(!lapsed_within_day(&utc(2024, 1, 2, 6), &now));
        assert!(!lapsed_within_day(&utc(2024, 1, 3, 0), &now));
    }

    #[test]
    fn test_inactive_subscriptions_are_not_classified() {
        let now = utc(2024, 1, 1, 0);
        for status in [SubscriptionStatus::Expired, SubscriptionStatus::Cancelled] {
            let sub = subscription(Some(utc(2024, 1, 2, 0)), status);
            assert_eq!(evaluate(&sub, &now), None);
        }
    }

    #[test]
    fn test_missing_end_date_is_left_unclassified() {
        let sub = subscription(None, SubscriptionStatus::Active);
        assert_eq!(evaluate(&sub, &utc(2024, 1, 1, 0)), None);
        assert_eq!(evaluate_now(&sub), None);
    }

    #[test]
    fn test_status_text_and_advice() {
        assert_eq!(UrgencyClassification::from_days(-1).status_text(), "Expired");
        assert_eq!(UrgencyClassification::from_days(0).status_text(), "Expires Today");
        assert_eq!(UrgencyClassification::from_days(1).status_text(), "1 day left");
        assert!(UrgencyClassification::from_days(1).advice().contains("immediately"));
        assert!(UrgencyClassification::from_days(5).advice().contains("5 days"));
    }

    #[test]
    fn test_format_time_remaining() {
        let now = utc(2024, 1, 1, 0);
        assert_eq!(format_time_remaining(&utc(2023, 12, 31, 0), &now), "EXPIRED");
        assert_eq!(format_time_remaining(&utc(2024, 1, 3, 4), &now), "2d 4h");
        assert_eq!(
            format_time_remaining(&(now + Duration::minutes(192)), &now),
            "3h 12m"
        );
        assert_eq!(
            format_time_remaining(&(now + Duration::minutes(45)), &now),
            "45m"
        );
    }

    #[test]
    fn test_days_left_counts_calendar_days_across_dst() {
        use super::dst_zone::SpringForward;

        // Mar 29 09:00 to Apr 1 09:00 local spans the Mar 31 clock change
        let now = SpringForward.with_ymd_and_hms(2024, 3, 29, 9, 0, 0).unwrap();
        let end = SpringForward
            .with_ymd_and_hms(2024, 4, 1, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(end - now.with_timezone(&Utc), Duration::hours(71));
        assert_eq!(days_left(&end, &now), 3);
        // A frozen offset sees the same instant an hour short of three days
        assert_eq!(days_left(&end, &now.fixed_offset()), 2);
    }
}

/// Zone at UTC+1 that moves to UTC+2 at 2024-03-31 01:00 UTC
#[cfg(test)]
pub(crate) mod dst_zone {
    use chrono::{
        Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    };

    #[derive(Debug, Clone, Copy)]
    pub struct SpringForward;

    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
    }

    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            if *local - Duration::hours(1) < switch_utc() {
                LocalResult::Single(winter())
            } else if *local - Duration::hours(2) >= switch_utc() {
                LocalResult::Single(summer())
            } else {
                // 02:00-03:00 local is skipped
                LocalResult::None
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < switch_utc() {
                winter()
            } else {
                summer()
            }
        }
    }
}
