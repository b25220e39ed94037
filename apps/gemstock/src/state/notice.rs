//! Transient sync notifications.
//!
//! Sync never fails a user operation. Whatever happened on the wire comes
//! back as an optional `SyncNotice` next to the operation's result, for the
//! UI to show as a toast.

use serde::Serialize;
use ts_rs::TS;

use gemstock_sync::{MergeOutcome, PushOutcome, ReconcileReport, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SyncNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl SyncNotice {
    pub fn info(message: impl Into<String>) -> Self {
        SyncNotice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        SyncNotice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SyncNotice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// `None` for `NotConfigured`: sync that is off is not news.
    pub fn from_error(err: &SyncError) -> Option<Self> {
        if err.is_not_configured() {
            return None;
        }
        let message = err.user_message();
        Some(match err {
            SyncError::DocumentGone { .. } | SyncError::CorruptLocal(_) => SyncNotice::warning(message),
            _ => SyncNotice::error(message),
        })
    }

    /// Only a newly created remote document is worth a toast after a save.
    pub fn from_push(outcome: &PushOutcome) -> Option<Self> {
        match outcome {
            PushOutcome::Created { .. } => Some(SyncNotice::info("Remote copy created")),
            PushOutcome::Updated { .. } | PushOutcome::Skipped => None,
        }
    }

    pub fn from_push_result(result: &Result<PushOutcome, SyncError>) -> Option<Self> {
        match result {
            Ok(outcome) => SyncNotice::from_push(outcome),
            Err(e) => SyncNotice::from_error(e),
        }
    }

    /// Summary of a manual or periodic sync.
    pub fn from_report(report: &ReconcileReport) -> Vec<Self> {
        let mut notices: Vec<Self> = report.failures().filter_map(SyncNotice::from_error).collect();
        if notices.is_empty() {
            match &report.pull {
                Some(Ok(MergeOutcome::Merged { final_count, .. })) => {
                    notices.push(SyncNotice::info(format!("Synced, {} products", final_count)))
                }
                Some(Ok(MergeOutcome::KeptLocal)) => {
                    notices.push(SyncNotice::info("Remote copy is empty, local data kept"))
                }
                _ => {}
            }
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_is_silent() {
        assert_eq!(SyncNotice::from_error(&SyncError::NotConfigured("sync is disabled")), None);
        assert_eq!(SyncNotice::from_push(&PushOutcome::Skipped), None);
    }

    #[test]
    fn test_levels() {
        let gone = SyncNotice::from_error(&SyncError::DocumentGone { document_id: "d".into() }).unwrap();
        assert_eq!(gone.level, NoticeLevel::Warning);
        let down = SyncNotice::from_error(&SyncError::Transport("refused".into())).unwrap();
        assert_eq!(down.level, NoticeLevel::Error);
        assert_eq!(down.message, "Sync service is unreachable");
    }

    #[test]
    fn test_report_summary() {
        let report = ReconcileReport {
            push: Ok(PushOutcome::Skipped),
            pull: Some(Ok(MergeOutcome::Merged { final_count: 4, remote_count: 2, local_only_count: 2 })),
        };
        assert_eq!(SyncNotice::from_report(&report), vec![SyncNotice::info("Synced, 4 products")]);

        let report = ReconcileReport {
            push: Err(SyncError::RemoteError { status: 500, message: String::new() }),
            pull: None,
        };
        let notices = SyncNotice::from_report(&report);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }
}
