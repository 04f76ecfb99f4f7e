//! HTTP Remote Store
//!
//! reqwest-backed [`RemoteStore`] over a Graph-style mailbox REST API. Listing
//! endpoints accept `$top`/`$skip` offset paging and report continuation with
//! an `@odata.nextLink` field; the page cursor maps directly onto the skip
//! offset. This module is deliberately thin glue: all filtering and field
//! selection is expressed as query parameters, and every failure surfaces as
//! [`SnapshotError::Fetch`].

use crate::config::ConnectionConfig;
use crate::error::SnapshotError;
use crate::hierarchy::FolderNode;
use crate::page::{Page, PageCursor};
use crate::store::{FlagStatus, MessageScope, RawMessage, RemoteStore};
use crate::types::FolderId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Folder class marking mail folders as hierarchy-eligible.
const MAIL_FOLDER_CLASS: &str = "IPF.Note";

/// Item class selecting plain mail messages.
const MESSAGE_CLASS: &str = "IPM.Note";

/// Fields requested for each message page.
const MESSAGE_FIELDS: &str = "id,parentFolderId,receivedDateTime,subject,flag,isRead";

pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    mailbox: String,
    token: String,
}

impl HttpStore {
    pub fn new(connection: &ConnectionConfig) -> Result<Self, SnapshotError> {
        let client = reqwest::Client::builder().build()?;
        Ok(HttpStore {
            client,
            base_url: connection.base_url.trim_end_matches('/').to_string(),
            mailbox: connection.mailbox.clone(),
            token: connection.resolved_token()?,
        })
    }

    fn folders_url(&self) -> String {
        format!("{}/users/{}/mailFolders", self.base_url, self.mailbox)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SnapshotError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn fetch_folder_page(
        &self,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<FolderNode>, SnapshotError> {
        let query = [
            (
                "$filter",
                format!("folderClass eq '{}'", MAIL_FOLDER_CLASS),
            ),
            ("$top", page_size.to_string()),
            ("$skip", cursor.offset().to_string()),
        ];
        let list: ListResponse<FolderDto> = self.get_json(&self.folders_url(), &query).await?;
        let count = list.value.len();
        Ok(Page {
            items: list.value.into_iter().map(FolderDto::into_node).collect(),
            next_cursor: cursor.advance(count),
            has_more: list.next_link.is_some(),
        })
    }

    async fn fetch_message_page(
        &self,
        scope: &MessageScope,
        cursor: PageCursor,
        page_size: usize,
    ) -> Result<Page<RawMessage>, SnapshotError> {
        let mut filter = format!("itemClass eq '{}'", MESSAGE_CLASS);
        if let Some(excluded) = &scope.excluded_folder {
            filter.push_str(&format!(
                " and parentFolderId ne '{}'",
                quote_escape(excluded)
            ));
        }
        let url = format!("{}/{}/messages", self.folders_url(), scope.source_folder);
        let query = [
            ("$select", MESSAGE_FIELDS.to_string()),
            ("$filter", filter),
            ("$top", page_size.to_string()),
            ("$skip", cursor.offset().to_string()),
        ];
        let list: ListResponse<MessageDto> = self.get_json(&url, &query).await?;
        let count = list.value.len();
        Ok(Page {
            items: list.value.into_iter().map(MessageDto::into_message).collect(),
            next_cursor: cursor.advance(count),
            has_more: list.next_link.is_some(),
        })
    }

    async fn find_folders_by_name(
        &self,
        display_name: &str,
    ) -> Result<Vec<FolderNode>, SnapshotError> {
        let query = [
            (
                "$filter",
                format!("displayName eq '{}'", quote_escape(display_name)),
            ),
            ("$includeHiddenFolders", "true".to_string()),
        ];
        let list: ListResponse<FolderDto> = self.get_json(&self.folders_url(), &query).await?;
        Ok(list.value.into_iter().map(FolderDto::into_node).collect())
    }

    async fn junk_folder_id(&self) -> Result<FolderId, SnapshotError> {
        let url = format!("{}/junkemail", self.folders_url());
        let folder: FolderDto = self.get_json(&url, &[]).await?;
        Ok(folder.id)
    }
}

/// Single quotes inside OData string literals are doubled.
fn quote_escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderDto {
    id: String,
    #[serde(default)]
    parent_folder_id: Option<String>,
    #[serde(default)]
    display_name: String,
}

impl FolderDto {
    fn into_node(self) -> FolderNode {
        FolderNode {
            id: self.id,
            parent_id: self.parent_folder_id,
            display_name: self.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDto {
    id: String,
    parent_folder_id: String,
    received_date_time: DateTime<Utc>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    flag: Option<FlagDto>,
    #[serde(default)]
    is_read: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagDto {
    #[serde(default)]
    flag_status: Option<String>,
    #[serde(default)]
    completed_date_time: Option<DateTime<Utc>>,
}

impl MessageDto {
    fn into_message(self) -> RawMessage {
        let (status, completed_at) = match self.flag {
            Some(flag) => (flag.flag_status, flag.completed_date_time),
            None => (None, None),
        };
        let flag = match status.as_deref() {
            Some("flagged") => FlagStatus::Flagged,
            Some("complete") => FlagStatus::Complete,
            _ => FlagStatus::NotFlagged,
        };
        RawMessage {
            id: self.id,
            parent_folder_id: self.parent_folder_id,
            received_at: self.received_date_time,
            subject: self.subject.unwrap_or_default(),
            flag,
            completed_at,
            is_read: self.is_read,
        }
    }
}
