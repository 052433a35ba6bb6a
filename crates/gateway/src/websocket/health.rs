//! WebSocket connection health monitoring.
//!
//! The read task records inbound activity; the write task runs the
//! heartbeat and decides when the connection has gone quiet.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Health monitoring configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Heartbeat interval (server sends ping)
    pub heartbeat_interval: Duration,

    /// Client idle timeout (no activity)
    pub idle_timeout: Duration,

    /// Pong timeout (after ping sent)
    pub pong_timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(90),
            pong_timeout: Duration::from_secs(10),
        }
    }
}

impl HealthConfig {
    /// Create from config values
    pub fn from_config(heartbeat_secs: u64, idle_timeout_secs: u64) -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(heartbeat_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
            pong_timeout: Duration::from_secs(10),
        }
    }
}

/// Connection health state, shared between the read and write tasks.
#[derive(Debug)]
pub struct ConnectionHealth {
    /// Last client activity (any message received)
    last_activity: Mutex<Instant>,

    /// Last ping sent to the client, cleared by activity
    last_ping: Mutex<Option<Instant>>,

    config: HealthConfig,
}

impl ConnectionHealth {
    /// Create new health tracker
    pub fn new(config: HealthConfig) -> Self {
        Self {
            last_activity: Mutex::new(Instant::now()),
            last_ping: Mutex::new(None),
            config,
        }
    }

    /// Record client activity
    pub fn record_activity(&self) {
        *self.last_activity.lock().unwrap() = Instant::now();
        *self.last_ping.lock().unwrap() = None;
    }

    /// Record ping sent
    pub fn record_ping(&self) {
        *self.last_ping.lock().unwrap() = Some(Instant::now());
    }

    /// Check if client is idle (no activity beyond timeout)
    pub fn is_idle(&self) -> bool {
        self.last_activity.lock().unwrap().elapsed() > self.config.idle_timeout
    }

    /// Check if pong is overdue (ping sent but no response)
    pub fn is_pong_overdue(&self) -> bool {
        self.last_ping
            .lock()
            .unwrap()
            .map(|ping_time| ping_time.elapsed() > self.config.pong_timeout)
            .unwrap_or(false)
    }

    /// Check if a heartbeat ping should be sent
    pub fn needs_ping(&self) -> bool {
        self.last_activity.lock().unwrap().elapsed() > self.config.heartbeat_interval
            && self.last_ping.lock().unwrap().is_none()
    }

    /// Get seconds since last activity
    pub fn seconds_since_activity(&self) -> u64 {
        self.last_activity.lock().unwrap().elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_connection_health() {
        let config = HealthConfig {
            heartbeat_interval: Duration::from_millis(50),
            idle_timeout: Duration::from_millis(100),
            pong_timeout: Duration::from_millis(30),
        };

        let health = ConnectionHealth::new(config);

        // Initially not idle
        assert!(!health.is_idle());

        // After activity, still not idle
        health.record_activity();
        assert!(!health.is_idle());

        // Wait and check idle
        sleep(Duration::from_millis(150));
        assert!(health.is_idle());
        assert!(health.needs_ping());

        // Record ping
        health.record_ping();
        sleep(Duration::from_millis(50));
        assert!(health.is_pong_overdue());

        // Activity clears the pending ping
        health.record_activity();
        assert!(!health.is_pong_overdue());
        assert!(!health.is_idle());
    }
}
