//! Live store integration tests
//!
//! MemoryStore exercised through the `LiveStore` trait, and controllers over
//! records sectioned through JSON key paths.

mod live_store;
