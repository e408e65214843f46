// Demo data used when the store has nothing yet
use crate::models::{
    Bike, BikeKind, BikeStation, Plan, PlanKind, Rental, RentalStatus, Subscription,
    SubscriptionStatus, User,
};
use chrono::{Duration, Utc};

pub fn user() -> User {
    User {
        id: "1".to_string(),
        name: "Alex Johnson".to_string(),
        email: "alex.johnson@email.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        avatar: None,
    }
}

pub fn stations() -> Vec<BikeStation> {
    vec![
        station("1", "Central Park Station", "123 Park Ave, New York, NY", 40.7829, -73.9654, 8, 12, 0.2),
        station("2", "Times Square Hub", "456 Broadway, New York, NY", 40.7580, -73.9855, 5, 15, 0.8),
        station("3", "Brooklyn Bridge Point", "789 Bridge St, Brooklyn, NY", 40.7061, -73.9969, 12, 18, 1.2),
        station("4", "University Campus", "321 College Ave, New York, NY", 40.7505, -73.9934, 3, 10, 1.5),
    ]
}

#[allow(clippy::too_many_arguments)]
fn station(
    id: &str,
    name: &str,
    address: &str,
    latitude: f64,
    longitude: f64,
    available_bikes: u32,
    total_bikes: u32,
    distance: f64,
) -> BikeStation {
    BikeStation {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        latitude,
        longitude,
        available_bikes,
        total_bikes,
        distance: Some(distance),
    }
}

pub fn bikes() -> Vec<Bike> {
    vec![
        bike("1", "Urban Cruiser", BikeKind::Standard, None, "1", true),
        bike("2", "E-Bike Pro", BikeKind::Electric, Some(85), "1", true),
        bike("3", "City Rider", BikeKind::Standard, None, "2", true),
        bike("4", "Thunder Bolt", BikeKind::Electric, Some(92), "3", false),
    ]
}

fn bike(
    id: &str,
    model: &str,
    kind: BikeKind,
    battery_level: Option<u8>,
    station_id: &str,
    is_available: bool,
) -> Bike {
    Bike {
        id: id.to_string(),
        model: model.to_string(),
        kind,
        battery_level,
        station_id: station_id.to_string(),
        is_available,
    }
}

pub fn plans() -> Vec<Plan> {
    vec![
        plan(
            "weekly-basic",
            "Weekly Explorer",
            PlanKind::Weekly,
            25,
            7,
            &[
                "Unlimited 30-minute rides",
                "Access to all stations",
                "Standard bikes included",
                "Mobile app support",
            ],
            false,
        ),
        plan(
            "weekly-premium",
            "Weekly Premium",
            PlanKind::Weekly,
            35,
            7,
            &[
                "Unlimited 45-minute rides",
                "Access to all stations",
                "Electric bikes included",
                "Priority bike reservation",
                "Mobile app support",
            ],
            true,
        ),
        plan(
            "monthly-basic",
            "Monthly Commuter",
            PlanKind::Monthly,
            80,
            30,
            &[
                "Unlimited 30-minute rides",
                "Access to all stations",
                "Standard bikes included",
                "Mobile app support",
                "20% discount on extra time",
            ],
            false,
        ),
        plan(
            "monthly-premium",
            "Monthly Unlimited",
            PlanKind::Monthly,
            120,
            30,
            &[
                "Unlimited 60-minute rides",
                "Access to all stations",
                "Electric bikes included",
                "Priority bike reservation",
                "Mobile app support",
                "Free extra time up to 15 minutes",
            ],
            true,
        ),
    ]
}

fn plan(
    id: &str,
    name: &str,
    kind: PlanKind,
    price: u32,
    duration_days: i64,
    features: &[&str],
    popular: bool,
) -> Plan {
    Plan {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        price,
        duration_days,
        features: features.iter().map(|f| f.to_string()).collect(),
        popular,
    }
}

/// The operator's own plan, started five days ago and ending in two
pub fn subscriptions() -> Vec<Subscription> {
    let now = Utc::now();
    vec![Subscription {
        id: "sub-1".to_string(),
        user_id: "1".to_string(),
        plan_id: "weekly-premium".to_string(),
        start_date: now - Duration::days(5),
        end_date: Some(now + Duration::days(2)),
        status: SubscriptionStatus::Active,
        auto_renew: true,
    }]
}

pub fn rentals() -> Vec<Rental> {
    let now = Utc::now();
    vec![
        Rental {
            id: "rental-1".to_string(),
            user_id: "1".to_string(),
            bike_id: "2".to_string(),
            start_time: now - Duration::days(2) - Duration::minutes(25),
            end_time: Some(now - Duration::days(2)),
            start_station: "Central Park Station".to_string(),
            end_station: Some("Times Square Hub".to_string()),
            cost: 0,
            status: RentalStatus::Completed,
        },
        Rental {
            id: "rental-2".to_string(),
            user_id: "1".to_string(),
            bike_id: "1".to_string(),
            start_time: now - Duration::days(1) - Duration::minutes(40),
            end_time: Some(now - Duration::days(1)),
            start_station: "Times Square Hub".to_string(),
            end_station: Some("Brooklyn Bridge Point".to_string()),
            cost: 0,
            status: RentalStatus::Completed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_catalog_shape() {
        let plans = plans();
        assert_eq!(plans.len(), 4);
        assert_eq!(plans.iter().filter(|p| p.kind == PlanKind::Weekly).count(), 2);
        assert!(plans
            .iter()
            .filter(|p| p.kind == PlanKind::Monthly)
            .all(|p| p.duration_days == 30));
    }

    #[test]
    fn test_seed_subscription_is_active_and_valid() {
        let subs = subscriptions();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].is_active());
        assert!(subs[0].has_valid_period());
        assert!(plans().iter().any(|p| p.id == subs[0].plan_id));
    }

    #[test]
    fn test_bikes_reference_known_stations() {
        let stations = stations();
        for bike in bikes() {
            assert!(stations.iter().any(|s| s.id == bike.station_id));
        }
    }
}
