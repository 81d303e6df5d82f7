//! Bounded audit tables

use super::MemoryStore;
use crate::core::models::{AuthLogEntry, RateLimitLogEntry, RequestLogEntry};
use crate::storage::AuditStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
    if queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(item);
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn record_request(&self, entry: RequestLogEntry) -> Result<()> {
        let mut audit = self.audit.lock();
        push_bounded(&mut audit.requests, entry, self.audit_capacity);
        Ok(())
    }

    async fn record_auth(&self, entry: AuthLogEntry) -> Result<()> {
        let mut audit = self.audit.lock();
        push_bounded(&mut audit.auth, entry, self.audit_capacity);
        Ok(())
    }

    async fn record_rate_limit(&self, entry: RateLimitLogEntry) -> Result<()> {
        let mut audit = self.audit.lock();
        push_bounded(&mut audit.rate_limits, entry, self.audit_capacity);
        Ok(())
    }
}

impl MemoryStore {
    pub fn request_logs(&self) -> Vec<RequestLogEntry> {
        self.audit.lock().requests.iter().cloned().collect()
    }

    pub fn auth_logs(&self) -> Vec<AuthLogEntry> {
        self.audit.lock().auth.iter().cloned().collect()
    }

    pub fn rate_limit_logs(&self) -> Vec<RateLimitLogEntry> {
        self.audit.lock().rate_limits.iter().cloned().collect()
    }
}
