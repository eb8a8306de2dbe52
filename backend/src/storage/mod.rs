//! External collaborators: the object store holding the stimuli and the
//! document store receiving the study records.

pub mod document_store;
pub mod object_store;

pub use document_store::{DocumentStore, DocumentStoreError, SqliteDocumentStore};
pub use object_store::{FsObjectStore, ObjectStore, StoreError};
