//! Message Projection
//!
//! Maps a raw message plus its resolved folder path into the output record.
//! Folder attribution is correctness-critical: a parent folder id missing from
//! the path table is surfaced as [`SnapshotError::UnknownFolder`] for that
//! message, never substituted with a default.

use crate::error::SnapshotError;
use crate::hierarchy::PathTable;
use crate::store::{FlagStatus, RawMessage};
use crate::types::MessageId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// One output record per processed message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub id: MessageId,
    /// Fully-qualified display path of the containing folder.
    pub folder: String,
    /// ISO-8601 receive timestamp.
    pub datetime: String,
    pub subject: String,
    pub flagged: bool,
    pub complete: bool,
    /// ISO-8601 completion timestamp; null unless the flag is complete.
    pub completed: Option<String>,
    pub read: bool,
}

/// Joins raw messages against the path table built by the hierarchy phase.
pub struct MessageProjector<'a> {
    paths: &'a PathTable,
}

impl<'a> MessageProjector<'a> {
    pub fn new(paths: &'a PathTable) -> Self {
        MessageProjector { paths }
    }

    pub fn project(&self, message: RawMessage) -> Result<MessageRecord, SnapshotError> {
        let folder = self
            .paths
            .get(&message.parent_folder_id)
            .ok_or_else(|| SnapshotError::UnknownFolder {
                message_id: message.id.clone(),
                folder_id: message.parent_folder_id.clone(),
            })?
            .to_string();

        let complete = message.flag == FlagStatus::Complete;
        Ok(MessageRecord {
            id: message.id,
            folder,
            datetime: iso8601(&message.received_at),
            subject: message.subject,
            flagged: message.flag != FlagStatus::NotFlagged,
            complete,
            completed: if complete {
                message.completed_at.as_ref().map(iso8601)
            } else {
                None
            },
            read: message.is_read,
        })
    }
}

fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{FolderGraphBuilder, FolderNode};
    use chrono::TimeZone;

    fn table() -> PathTable {
        let mut builder = FolderGraphBuilder::new();
        for (id, parent, name) in [
            ("1", None, "Inbox"),
            ("2", Some("1"), "Work"),
            ("3", Some("2"), "Archive"),
        ] {
            builder
                .insert(FolderNode {
                    id: id.to_string(),
                    parent_id: parent.map(str::to_string),
                    display_name: name.to_string(),
                })
                .unwrap();
        }
        builder.into_path_table()
    }

    fn message(folder_id: &str, flag: FlagStatus) -> RawMessage {
        RawMessage {
            id: "msg-1".to_string(),
            parent_folder_id: folder_id.to_string(),
            received_at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap(),
            subject: "quarterly report".to_string(),
            flag,
            completed_at: Some(Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()),
            is_read: true,
        }
    }

    #[test]
    fn test_projects_resolved_folder_path() {
        let table = table();
        let record = MessageProjector::new(&table)
            .project(message("3", FlagStatus::NotFlagged))
            .unwrap();
        assert_eq!(record.folder, "Inbox/Work/Archive");
        assert_eq!(record.datetime, "2024-03-14T09:26:53Z");
        assert_eq!(record.subject, "quarterly report");
        assert!(!record.flagged);
        assert!(!record.complete);
        assert_eq!(record.completed, None);
        assert!(record.read);
    }

    #[test]
    fn test_unknown_parent_folder_is_surfaced_per_message() {
        let table = table();
        let err = MessageProjector::new(&table)
            .project(message("nope", FlagStatus::NotFlagged))
            .unwrap_err();
        assert!(err.is_message_scoped());
        assert!(matches!(
            err,
            SnapshotError::UnknownFolder { folder_id, .. } if folder_id == "nope"
        ));
    }

    #[test]
    fn test_flagged_message_without_completion() {
        let table = table();
        let record = MessageProjector::new(&table)
            .project(message("1", FlagStatus::Flagged))
            .unwrap();
        assert!(record.flagged);
        assert!(!record.complete);
        assert_eq!(record.completed, None);
    }

    #[test]
    fn test_completed_timestamp_only_when_flag_is_complete() {
        let table = table();
        let record = MessageProjector::new(&table)
            .project(message("1", FlagStatus::Complete))
            .unwrap();
        assert!(record.flagged);
        assert!(record.complete);
        assert_eq!(record.completed.as_deref(), Some("2024-03-15T08:00:00Z"));
    }

    #[test]
    fn test_record_serializes_with_original_field_names() {
        let table = table();
        let record = MessageProjector::new(&table)
            .project(message("1", FlagStatus::NotFlagged))
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(json["folder"], "Inbox");
        assert_eq!(json["datetime"], "2024-03-14T09:26:53Z");
        assert!(json["completed"].is_null());
        assert_eq!(json["read"], true);
    }
}
