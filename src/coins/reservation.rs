//! Coin reservations for concurrent builds from the same account.
//!
//! A coin referenced by an intent that has been built but not yet settled
//! must not be handed to a second build. Reservations are held by a
//! [`ReservationGuard`] and released when the guard is dropped, which also
//! covers a request future that is cancelled mid-flight.

use crate::coins::CoinSet;
use crate::core::{ObjectId, SdkError, SdkResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct CoinReservations {
    reserved: Arc<DashMap<ObjectId, ()>>,
}

impl CoinReservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve every id or none of them.
    pub fn reserve(&self, ids: &[ObjectId]) -> SdkResult<ReservationGuard> {
        let mut taken = Vec::with_capacity(ids.len());

        for id in ids {
            // The shard lock held by the entry must be gone before rollback
            let conflict = match self.reserved.entry(id.clone()) {
                Entry::Occupied(_) => true,
                Entry::Vacant(slot) => {
                    slot.insert(());
                    false
                }
            };

            if conflict {
                for prior in &taken {
                    self.reserved.remove(prior);
                }
                return Err(SdkError::CoinReserved(id.to_string()));
            }
            taken.push(id.clone());
        }

        debug!("Reserved {} coins", taken.len());
        Ok(ReservationGuard {
            reserved: self.reserved.clone(),
            ids: taken,
        })
    }

    pub fn is_reserved(&self, id: &ObjectId) -> bool {
        self.reserved.contains_key(id)
    }

    /// Snapshot with currently reserved coins removed.
    pub fn filter(&self, coins: &CoinSet) -> CoinSet {
        coins.without(|id| self.is_reserved(id))
    }

    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}

/// Releases its coins on drop.
pub struct ReservationGuard {
    reserved: Arc<DashMap<ObjectId, ()>>,
    ids: Vec<ObjectId>,
}

impl ReservationGuard {
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    /// Fold another guard into this one so both sets are released together.
    pub fn absorb(&mut self, mut other: ReservationGuard) {
        self.ids.append(&mut other.ids);
    }
}

impl Drop for ReservationGuard {
    fn drop(&mut self) {
        for id in &self.ids {
            self.reserved.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::test_support::coin_set;

    fn ids(raw: &[&str]) -> Vec<ObjectId> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_reserve_and_release_on_drop() {
        let reservations = CoinReservations::new();
        let guard = reservations.reserve(&ids(&["0x1", "0x2"])).unwrap();
        assert_eq!(reservations.len(), 2);
        assert_eq!(guard.ids().len(), 2);

        drop(guard);
        assert!(reservations.is_empty());
    }

    #[test]
    fn test_conflict_rolls_back() {
        let reservations = CoinReservations::new();
        let _held = reservations.reserve(&ids(&["0x2"])).unwrap();

        let err = reservations.reserve(&ids(&["0x1", "0x2"])).err().unwrap();
        assert_eq!(err, SdkError::CoinReserved("0x2".to_string()));
        assert!(!reservations.is_reserved(&"0x1".parse().unwrap()));
        assert_eq!(reservations.len(), 1);
    }

    #[test]
    fn test_filter_hides_reserved_coins() {
        let reservations = CoinReservations::new();
        let set = coin_set("0x2::sui::SUI", &[10, 20, 30]);
        let _guard = reservations.reserve(&ids(&["0x3"])).unwrap();

        let visible = reservations.filter(&set);
        assert_eq!(visible.total_balance(), 30);
    }

    #[test]
    fn test_absorb_releases_both() {
        let reservations = CoinReservations::new();
        let mut first = reservations.reserve(&ids(&["0x1"])).unwrap();
        let second = reservations.reserve(&ids(&["0x2"])).unwrap();
        first.absorb(second);
        assert_eq!(reservations.len(), 2);

        drop(first);
        assert!(reservations.is_empty());
    }
}
