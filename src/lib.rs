//! Service request tracker: a ticket/user catalog with flat-file persistence
//! and timestamped backups.
//!
//! - `models`: record types and the fixed status/priority/role/category sets
//! - `store`: in-memory catalog and every lifecycle rule
//! - `codec`: line codec for the catalog files
//! - `persist`: catalog file gateway
//! - `backup`: snapshot and restore of the catalog files
//! - `commands`: CLI command implementations

pub mod backup;
pub mod codec;
pub mod commands;
pub mod models;
pub mod persist;
pub mod store;
