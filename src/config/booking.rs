//! Booking guard settings

use serde::Deserialize;

use crate::domain::roster::CapacityPolicy;

/// Checks applied by the guarded booking path
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BookingConfig {
    /// Refuse a booking while the user holds an active one elsewhere
    #[serde(default = "default_enforce_single_active_booking")]
    pub enforce_single_active_booking: bool,

    /// What happens when a full session receives a new request
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            enforce_single_active_booking: default_enforce_single_active_booking(),
            capacity_policy: CapacityPolicy::default(),
        }
    }
}

fn default_enforce_single_active_booking() -> bool {
    true
}
