//! Blob storage for rendered plan documents.
//!
//! The Record Store's object-storage facility is the only blob host the bot
//! uses: upload a document, get back a durable public URL to hand to the
//! client. This crate provides:
//!
//! - [`BlobStore`] - the upload trait the pipeline depends on
//! - [`HttpBlobStore`] - the Record Store HTTP implementation
//! - [`MemoryBlobStore`] - an in-memory test double

mod config;
mod error;
mod store;

pub use config::BlobStoreConfig;
pub use error::BlobError;
pub use store::{BlobStore, HttpBlobStore, MemoryBlobStore};
