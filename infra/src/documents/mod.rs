//! Hosted document store client

mod client;

pub use client::{FieldValue, FirestoreClient, FirestoreConfig};
