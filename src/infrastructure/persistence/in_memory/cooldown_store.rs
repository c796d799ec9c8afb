//! # In-Memory Cooldown Store
//!
//! In-memory implementation of [`CooldownStore`].
//!
//! Records live in a `DashMap` keyed by the lowercase address, so state is
//! lost on restart. Each admission decision is taken while holding the
//! map's entry for the address, which makes check-and-reserve atomic.

use crate::domain::entities::ClaimantRecord;
use crate::domain::services::{ClaimAdmission, CooldownPolicy};
use crate::domain::value_objects::{Timestamp, WalletAddress};
use crate::infrastructure::persistence::traits::{CooldownStore, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// In-memory implementation of [`CooldownStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCooldownStore {
    records: Arc<DashMap<String, ClaimantRecord>>,
}

impl InMemoryCooldownStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn record(&self, address: &WalletAddress) -> Option<ClaimantRecord> {
        self.records.get(&address.cooldown_key()).map(|r| *r)
    }
}

#[async_trait]
impl CooldownStore for InMemoryCooldownStore {
    async fn begin_claim(
        &self,
        address: &WalletAddress,
        now: Timestamp,
        policy: &CooldownPolicy,
    ) -> RepositoryResult<ClaimAdmission> {
        let admission = match self.records.entry(address.cooldown_key()) {
            Entry::Occupied(mut entry) => {
                let admission = policy.admit(entry.get(), &now);
                if admission.is_admitted() {
                    entry.get_mut().in_flight = true;
                }
                admission
            }
            Entry::Vacant(entry) => {
                entry.insert(ClaimantRecord {
                    last_claim: None,
                    in_flight: true,
                });
                ClaimAdmission::Admitted
            }
        };
        Ok(admission)
    }

    async fn complete_claim(
        &self,
        address: &WalletAddress,
        claimed_at: Timestamp,
    ) -> RepositoryResult<()> {
        match self.records.get_mut(&address.cooldown_key()) {
            Some(mut record) if record.in_flight => {
                record.last_claim = Some(claimed_at);
                record.in_flight = false;
                Ok(())
            }
            _ => Err(RepositoryError::not_reserved(address)),
        }
    }

    async fn abort_claim(&self, address: &WalletAddress) -> RepositoryResult<()> {
        let key = address.cooldown_key();
        if let Some(mut record) = self.records.get_mut(&key) {
            record.in_flight = false;
        }
        self.records.remove_if(&key, |_, record| record.is_vacant());
        Ok(())
    }
}
