use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

use uuid::Uuid;

/// Per-task serialization point for association mutations.
///
/// Two concurrent assign/move calls for the same task would otherwise both
/// pass their existence and idempotence checks before either write lands,
/// leaving two projects claiming the task. The guard is held across the
/// whole check-then-write sequence; every store call under it is
/// synchronous, so nothing is held across an await.
#[derive(Default)]
pub struct TaskLockMap {
    held: Mutex<HashSet<Uuid>>,
    released: Condvar,
}

impl TaskLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self, task_id: Uuid) -> TaskGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&task_id) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(task_id);
        TaskGuard {
            map: self,
            task_id,
        }
    }
}

pub struct TaskGuard<'a> {
    map: &'a TaskLockMap,
    task_id: Uuid,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .map
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.task_id);
        self.map.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn same_task_is_mutually_exclusive() {
        let locks = Arc::new(TaskLockMap::new());
        let task_id = Uuid::new_v4();
        let in_section = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let in_section = in_section.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let _guard = locks.lock(task_id);
                        assert_eq!(in_section.fetch_add(1, Ordering::SeqCst), 0);
                        in_section.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn different_tasks_do_not_block_each_other() {
        let locks = TaskLockMap::new();
        let _a = locks.lock(Uuid::new_v4());
        let _b = locks.lock(Uuid::new_v4());
    }
}
