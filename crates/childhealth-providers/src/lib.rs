//! childhealth-providers: find pediatric providers for a predicted condition.
//!
//! A condition maps to an NPI taxonomy code; the registry is queried with that
//! code plus city and state, and each hit is flattened into a display record.
//! Network and registry errors never escape `find_providers`: they read as
//! "no providers found".

pub mod error;
pub mod taxonomy;
pub mod record;
pub mod npi;
pub mod search;

pub use error::{ProviderError, Result};
pub use npi::{NpiRegistryClient, ProviderQuery, ProviderSource, StaticProviderSource};
pub use record::{format_provider_results, ProviderRecord};
pub use search::{find_providers, SearchOutcome};
pub use taxonomy::{taxonomy_code, UsState, DEFAULT_STATE, US_STATES};
