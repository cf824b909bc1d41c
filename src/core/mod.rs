//! Core reconciliation logic
//!
//! The engine composes three collaborators:
//! - `AccountRegistry`: account lookup and serialized balance mutation
//! - `MovementLedger`: movement rows and id assignment
//! - `TabularStore` (from the store module): persistence
//!
//! `importer` sits on top of the engine and maps card statements onto
//! movement creation.

pub mod account_registry;
pub mod engine;
pub mod importer;
pub mod movement_ledger;

pub use account_registry::AccountRegistry;
pub use engine::LedgerEngine;
pub use importer::import;
pub use movement_ledger::MovementLedger;
