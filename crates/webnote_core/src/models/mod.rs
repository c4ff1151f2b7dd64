//! Data models for notes, their metadata, and directory listings.

/// Note, metadata, and metadata patch types.
pub mod note;


pub use note::{MetaPatch, Note, NoteEntry, NoteMeta, Patch, UpdateTime};
