//! Change notifications
//!
//! Writes publish a [`ChangeEvent`]; views that want live updates subscribe
//! and re-query. Queries stay pull-based, and the bus carries no data
//! beyond what changed.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use tracing::warn;

use crate::models::{BudgetId, PeriodType, TransactionId, TransactionKind, UserId};

/// Something a view may need to refresh for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    TransactionAdded {
        user: UserId,
        id: TransactionId,
        kind: TransactionKind,
    },
    BudgetSaved {
        user: UserId,
        period_type: PeriodType,
        id: BudgetId,
    },
    BudgetsCleared {
        user: UserId,
        period_type: PeriodType,
        removed: usize,
    },
    PeriodTypeChanged(PeriodType),
    ProfileUpdated {
        user: UserId,
    },
}

/// Publish/subscribe fan-out over std channels
#[derive(Default)]
pub struct ChangeBus {
    subscribers: Mutex<Vec<Sender<ChangeEvent>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; dropping the receiver unsubscribes
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(tx),
            Err(e) => warn!("change bus lock poisoned, subscriber not registered: {}", e),
        }
        rx
    }

    /// Deliver an event to every live subscriber; returns how many got it
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let mut subscribers = match self.subscribers.lock() {
            Ok(subscribers) => subscribers,
            Err(e) => {
                warn!("change bus lock poisoned, event dropped: {}", e);
                return 0;
            }
        };
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = ChangeBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        let delivered = bus.publish(ChangeEvent::PeriodTypeChanged(PeriodType::Weekly));
        assert_eq!(delivered, 2);
        assert_eq!(
            a.try_recv().unwrap(),
            ChangeEvent::PeriodTypeChanged(PeriodType::Weekly)
        );
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = ChangeBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(ChangeEvent::PeriodTypeChanged(PeriodType::Monthly)), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = ChangeBus::new();
        assert_eq!(
            bus.publish(ChangeEvent::ProfileUpdated {
                user: UserId::from("u1")
            }),
            0
        );
    }
}
