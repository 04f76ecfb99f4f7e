//! Core identifier types for the mailbox snapshot pipeline.

/// FolderId: Opaque unique identifier of a remote folder
pub type FolderId = String;

/// MessageId: Opaque unique identifier of a remote message
pub type MessageId = String;
