// Key-value persistence for desk state
mod file;
#[cfg(test)]
mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::error::{DeskError, Result};
use crate::models::{
    Bike, BikeStation, Customer, CustomerSubscription, Plan, Rental, Subscription, User,
};
use crate::notifications::Inbox;
use crate::seed;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed names the desk state is stored under
pub mod keys {
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const CUSTOMERS: &str = "customers";
    pub const CUSTOMER_SUBSCRIPTIONS: &str = "customerSubscriptions";
    pub const USER: &str = "user";
    pub const STATIONS: &str = "stations";
    pub const BIKES: &str = "bikes";
    pub const PLANS: &str = "plans";
    pub const RENTALS: &str = "rentals";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const LOGGED_IN: &str = "isLoggedIn";
}

/// Raw string storage keyed by name
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed JSON access to desk state on top of a `KeyValueStore`
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read and decode `key`; `None` when absent
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read `key`, falling back to `seed` when it is absent or unreadable.
    ///
    /// An absent key is initialised with the seed so later runs see the same
    /// data. A payload that fails to decode is left in place untouched.
    pub fn load_or_seed<T, F>(&self, key: &str, seed: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(raw) = self.store.get(key)? else {
            tracing::debug!("No stored value for '{}', seeding defaults", key);
            let value = seed();
            self.save(key, &value)?;
            return Ok(value);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Stored value for '{}' is unreadable ({}), using defaults", key, e);
                Ok(seed())
            }
        }
    }

    /// Read `key` ahead of writing it back.
    ///
    /// An absent key gives `empty()`. Unlike `load_or_seed`, a payload that
    /// fails to decode is an error, so the caller never saves over it.
    pub fn load_for_update<T, F>(&self, key: &str, empty: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("Stored value for '{}' is unreadable, refusing to modify it: {}", key, e);
                DeskError::Json(e)
            }),
            None => Ok(empty()),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    pub fn plans(&self) -> Result<Vec<Plan>> {
        self.load_or_seed(keys::PLANS, seed::plans)
    }

    pub fn stations(&self) -> Result<Vec<BikeStation>> {
        self.load_or_seed(keys::STATIONS, seed::stations)
    }

    pub fn bikes(&self) -> Result<Vec<Bike>> {
        self.load_or_seed(keys::BIKES, seed::bikes)
    }

    pub fn user(&self) -> Result<User> {
        self.load_or_seed(keys::USER, seed::user)
    }

    pub fn user_for_update(&self) -> Result<User> {
        self.load_for_update(keys::USER, seed::user)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.save(keys::USER, user)
    }

    pub fn rentals(&self) -> Result<Vec<Rental>> {
        self.load_or_seed(keys::RENTALS, seed::rentals)
    }

    /// The operator's own subscriptions
    pub fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.load_or_seed(keys::SUBSCRIPTIONS, seed::subscriptions)
    }

    pub fn customers(&self) -> Result<Vec<Customer>> {
        self.load_or_seed(keys::CUSTOMERS, Vec::new)
    }

    pub fn customer_subscriptions(&self) -> Result<Vec<CustomerSubscription>> {
        self.load_or_seed(keys::CUSTOMER_SUBSCRIPTIONS, Vec::new)
    }

    /// Append a newly enrolled customer and their subscription.
    ///
    /// Subscriptions are written first; if the customer list then fails to
    /// save, the previous subscriptions payload is put back.
    pub fn add_customer(&self, customer: Customer, subscription: CustomerSubscription) -> Result<()> {
        let mut customers: Vec<Customer> = self.load_for_update(keys::CUSTOMERS, Vec::new)?;
        let previous = self.store.get(keys::CUSTOMER_SUBSCRIPTIONS)?;
        let mut subscriptions: Vec<CustomerSubscription> = match &previous {
            Some(raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };

        customers.push(customer);
        subscriptions.push(subscription);

        self.save(keys::CUSTOMER_SUBSCRIPTIONS, &subscriptions)?;
        if let Err(e) = self.save(keys::CUSTOMERS, &customers) {
            let restored = match previous {
                Some(raw) => self.store.set(keys::CUSTOMER_SUBSCRIPTIONS, &raw),
                None => self.store.remove(keys::CUSTOMER_SUBSCRIPTIONS),
            };
            if let Err(rollback) = restored {
                tracing::error!("Failed to roll back subscriptions after a failed save: {}", rollback);
            }
            return Err(e);
        }

        Ok(())
    }

    pub fn notifications(&self) -> Result<Inbox> {
        self.load_or_seed(keys::NOTIFICATIONS, Inbox::default)
    }

    /// Stored notifications for mark-read, clear or merge
    pub fn notifications_for_update(&self) -> Result<Inbox> {
        self.load_for_update(keys::NOTIFICATIONS, Inbox::default)
    }

    pub fn save_notifications(&self, inbox: &Inbox) -> Result<()> {
        self.save(keys::NOTIFICATIONS, inbox)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.load(keys::LOGGED_IN)?.unwrap_or(false))
    }

    pub fn set_logged_in(&self, logged_in: bool) -> Result<()> {
        if logged_in {
            self.save(keys::LOGGED_IN, &true)
        } else {
            self.store.remove(keys::LOGGED_IN)
        }
    }
}
