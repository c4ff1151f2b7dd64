//! redb table definitions for the two namespaces.

use redb::TableDefinition;

/// Note rows (`KvEntry`, bincode-encoded).
pub(super) const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");
/// Share rows (`KvEntry`, bincode-encoded; value is the note path).
pub(super) const SHARE: TableDefinition<&str, &[u8]> = TableDefinition::new("share");
