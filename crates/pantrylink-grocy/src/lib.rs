//! HTTP clients for PantryLink's external services.
//!
//! [`GrocyClient`] implements the inventory-service contract against a
//! Grocy-compatible REST API; [`OpenFoodFactsClient`] implements the
//! third-party product lookup. Neither client retries: failures surface
//! immediately and the workflow layer decides whether they abort the
//! operation or are logged and swallowed.

mod grocy;
mod lookup;

pub use grocy::GrocyClient;
pub use lookup::OpenFoodFactsClient;
