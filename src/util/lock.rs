use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-unit locks serializing syncs of the same unit.
///
/// Cloning shares the underlying lock table.
#[derive(Clone, Default)]
pub struct UnitLocks {
    locks: Arc<Mutex<HashMap<i32, Arc<Mutex<()>>>>>,
}

impl UnitLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and acquires the lock of a unit.
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, unit_id: i32) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(unit_id).or_default())
        };

        lock.lock_owned().await
    }

    /// Drops the lock entry of a unit that no longer exists.
    pub async fn forget(&self, unit_id: i32) {
        self.locks.lock().await.remove(&unit_id);
    }
}
