//! Core business logic - framework-agnostic catalog, cart, session and login operations.

/// Credential storage and password checks
pub mod auth;
/// Cart merging and discount computation
pub mod cart;
/// Product catalog held in memory and persisted to a flat file
pub mod catalog;
/// Catalog file record format
pub mod record;
/// Text formatting shared by front ends
pub mod report;
/// Event-driven shopping session
pub mod shop;
