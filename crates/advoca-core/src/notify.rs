//! Transient user-facing notifications with auto-dismiss.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// How long a success notice stays visible.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

/// How long an error notice stays visible.
pub const ERROR_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A single transient notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    posted_at: Instant,
    ttl: Duration,
}

impl Notice {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.posted_at) >= self.ttl
    }
}

/// Shared notification surface.
///
/// Entries expire on their own TTL (success ~3s, error ~5s) and are swept
/// out when the surface is read; posting never blocks anything.
#[derive(Clone, Default)]
pub struct NotificationHub {
    entries: Arc<Mutex<Vec<Notice>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_success(&self, message: impl Into<String>) -> Uuid {
        self.post(NoticeKind::Success, message, SUCCESS_TTL)
    }

    pub fn post_error(&self, message: impl Into<String>) -> Uuid {
        self.post(NoticeKind::Error, message, ERROR_TTL)
    }

    /// Posts a notice with an explicit TTL.
    pub fn post(&self, kind: NoticeKind, message: impl Into<String>, ttl: Duration) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            posted_at: Instant::now(),
            ttl,
        };
        let id = notice.id;
        self.entries.lock().expect("notice lock poisoned").push(notice);
        id
    }

    /// Dismisses a notice before its TTL elapses.
    pub fn dismiss(&self, id: Uuid) {
        self.entries
            .lock()
            .expect("notice lock poisoned")
            .retain(|notice| notice.id != id);
    }

    /// Returns the notices still visible, sweeping out expired ones.
    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Instant::now())
    }

    /// Like [`active`](Self::active) with an explicit clock reading.
    pub fn active_at(&self, now: Instant) -> Vec<Notice> {
        let mut entries = self.entries.lock().expect("notice lock poisoned");
        entries.retain(|notice| !notice.is_expired_at(now));
        entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_read_back() {
        let hub = NotificationHub::new();
        hub.post_success("report.pdf uploaded");
        hub.post_error("Upload failed for brief.docx: file too large");

        let active = hub.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].kind, NoticeKind::Success);
        assert_eq!(active[1].kind, NoticeKind::Error);
    }

    #[test]
    fn test_notices_expire_on_their_own_ttl() {
        let hub = NotificationHub::new();
        hub.post_success("done");
        hub.post_error("failed");

        let later = Instant::now() + Duration::from_secs(4);
        let active = hub.active_at(later);
        // Success (3s) has expired, error (5s) is still visible.
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NoticeKind::Error);

        let much_later = Instant::now() + Duration::from_secs(6);
        assert!(hub.active_at(much_later).is_empty());
    }

    #[test]
    fn test_manual_dismiss() {
        let hub = NotificationHub::new();
        let id = hub.post_error("failed");
        hub.dismiss(id);
        assert!(hub.active().is_empty());
    }

    #[test]
    fn test_zero_ttl_is_never_visible() {
        let hub = NotificationHub::new();
        hub.post(NoticeKind::Success, "gone", Duration::ZERO);
        assert!(hub.active().is_empty());
    }
}
