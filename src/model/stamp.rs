use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of ids and timestamps for extracted records
///
/// Ids only need to be unique within one driver's catalog.
pub trait Stamper: Send + Sync {
    fn next_id(&self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUIDs and the wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamper;

impl Stamper for SystemStamper {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Predictable ids (`<prefix>-1`, `<prefix>-2`, ...) and a frozen clock
///
/// For reproducible snapshots and tests.
#[derive(Debug)]
pub struct SequentialStamper {
    prefix: String,
    counter: AtomicU64,
    at: DateTime<Utc>,
}

impl SequentialStamper {
    pub fn new(prefix: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
            at,
        }
    }
}

impl Stamper for SequentialStamper {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }

    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_system_ids_are_unique() {
        let stamper = SystemStamper;
        let ids: HashSet<String> = (0..100).map(|_| stamper.next_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_sequential_ids() {
        let at = Utc::now();
        let stamper = SequentialStamper::new("e", at);
        assert_eq!(stamper.next_id(), "e-1");
        assert_eq!(stamper.next_id(), "e-2");
        assert_eq!(stamper.now(), at);
    }
}
