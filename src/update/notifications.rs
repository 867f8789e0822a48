//! Notification list handlers

use crate::messages::Action;
use crate::model::{Notification, MAX_NOTIFICATIONS};

/// Add or remove notifications, keeping at most [`MAX_NOTIFICATIONS`]
/// (oldest dropped first)
pub fn update_notifications(notifications: &mut Vec<Notification>, action: &Action) {
    match action {
        Action::AddNotification(notification) => {
            if notifications.iter().any(|n| n.id == notification.id) {
                return;
            }
            notifications.push(notification.clone());
            if notifications.len() > MAX_NOTIFICATIONS {
                let excess = notifications.len() - MAX_NOTIFICATIONS;
                notifications.drain(..excess);
            }
        }
        Action::RemoveNotification { id } => notifications.retain(|n| n.id != *id),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;

    fn note(id: u64) -> Notification {
        Notification {
            id,
            kind: NotificationKind::Info,
            title: format!("n{id}"),
            message: String::new(),
            duration: 3000,
            timestamp: id,
        }
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut list = Vec::new();
        for id in 1..=7 {
            update_notifications(&mut list, &Action::AddNotification(note(id)));
        }
        let ids: Vec<u64> = list.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_remove() {
        let mut list = vec![note(1), note(2)];
        update_notifications(&mut list, &Action::RemoveNotification { id: 1 });
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 2);
    }
}
