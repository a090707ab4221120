//! In-process implementation of the PantryLink store contract.
//!
//! [`MemoryStore`] keeps barcode records, the scan log, API keys, and the
//! transaction mode behind a single `RwLock`, satisfying the contract's
//! requirement that the store, not its callers, owns the locking
//! discipline for concurrent requests. No guard is ever held across an
//! await point because the whole contract is synchronous.
//!
//! It doubles as the test fake: every workflow and handler test in the
//! workspace wires one of these in place of a persistent backend.

mod memory;

pub use memory::MemoryStore;
