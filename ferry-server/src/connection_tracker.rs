//! Session tracking and per-IP admission limiting
//!
//! Bounds how many concurrent sessions a single IP may hold and exposes the
//! total active count so shutdown can wait for sessions to drain.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Tracks active sessions per IP address
///
/// A limit of 0 means unlimited sessions are allowed.
#[derive(Debug)]
pub struct ConnectionTracker {
    /// Map of IP addresses to their current session count
    sessions: Arc<Mutex<HashMap<IpAddr, usize>>>,
    /// Maximum sessions allowed per IP (0 = unlimited)
    max_sessions_per_ip: AtomicUsize,
}

impl ConnectionTracker {
    /// Create a new tracker with the specified per-IP limit
    #[must_use]
    pub fn new(max_sessions_per_ip: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions_per_ip: AtomicUsize::new(max_sessions_per_ip),
        }
    }

    /// Try to acquire a session slot for the given IP
    ///
    /// Returns `Some(SessionGuard)` if the session is allowed, or `None` if
    /// the IP has reached its limit. The guard releases the slot on drop.
    pub fn try_acquire(&self, ip: IpAddr) -> Option<SessionGuard> {
        let max = self.max_sessions_per_ip.load(Ordering::Relaxed);
        let mut sessions = self.sessions.lock().expect("session tracker lock");
        let count = sessions.entry(ip).or_insert(0);

        // 0 means unlimited
        if max > 0 && *count >= max {
            return None;
        }

        *count += 1;
        Some(SessionGuard {
            ip,
            sessions: self.sessions.clone(),
        })
    }

    /// Total number of active sessions across all IPs
    #[must_use]
    pub fn total_sessions(&self) -> usize {
        let sessions = self.sessions.lock().expect("session tracker lock");
        sessions.values().sum()
    }
}

/// RAII guard that releases a session slot when dropped
///
/// Ensures slots are always released, even if the session handler panics or
/// returns early.
#[derive(Debug)]
pub struct SessionGuard {
    ip: IpAddr,
    sessions: Arc<Mutex<HashMap<IpAddr, usize>>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut sessions = self.sessions.lock().expect("session tracker lock");
        if let Some(count) = sessions.get_mut(&self.ip) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                sessions.remove(&self.ip);
            }
        }
    }
}
