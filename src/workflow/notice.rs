use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// A transient message for the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Increases with every notice raised on the same board.
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    raised_at: Instant,
}

/// Notices that expire `ttl` after being raised.
///
/// Time is read from tokio's clock, so paused-time tests can advance past the TTL.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, next_id: 0, notices: Vec::new() }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            severity,
            message: message.into(),
            raised_at: Instant::now(),
        });
    }

    /// Drops expired notices and returns the rest, oldest first.
    pub fn active(&mut self) -> Vec<Notice> {
        let now = Instant::now();
        let ttl = self.ttl;
        self.notices.retain(|notice| now.duration_since(notice.raised_at) < ttl);
        self.notices.clone()
    }
}
