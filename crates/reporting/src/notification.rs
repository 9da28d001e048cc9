//! Location Notifications

use sampling_loop::GeoFix;
use tracing::debug;

/// Human-readable alert for maintenance crews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Build the alert for a detection at a known position
    pub fn pothole(fix: GeoFix, count: u64, accepted_at_ms: u64, maps_base_url: &str) -> Self {
        let body = format!(
            "Pothole Detection Report\n\n\
             Location: {:.6}, {:.6}\n\
             Map: {}\n\
             Time: {} seconds since start\n\
             Pothole count: {}\n\n\
             This is an automated message from the pothole detection system.",
            fix.latitude,
            fix.longitude,
            maps_link(fix, maps_base_url),
            accepted_at_ms / 1000,
            count
        );
        Self {
            subject: "Pothole Alert".to_string(),
            body,
        }
    }
}

/// Map URL for a position, six decimal places
pub fn maps_link(fix: GeoFix, base_url: &str) -> String {
    format!("{}{:.6},{:.6}", base_url, fix.latitude, fix.longitude)
}

/// Caps the number of notifications sent in one session
#[derive(Debug, Clone)]
pub struct NotificationBudget {
    limit: usize,
    sent: usize,
}

impl NotificationBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, sent: 0 }
    }

    /// Consume one slot if any remain
    pub fn try_acquire(&mut self) -> bool {
        if self.sent >= self.limit {
            debug!("Notification budget exhausted ({} sent)", self.sent);
            return false;
        }
        self.sent += 1;
        true
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.sent
    }
}
