/// Creator Rights Registry
///
/// Tracks the people and brand mascots whose likeness appears in
/// production assets: their usage-rights windows, onboarding invitations
/// and the assets and projects they are credited on.

pub mod alerts;
pub mod clock;
pub mod config;
pub mod context;
pub mod creator;
pub mod credit;
pub mod error;
pub mod events;
pub mod invitation;
pub mod jobs;
pub mod metrics;
pub mod notify;
pub mod registry;
pub mod rights;
pub mod seed;

pub use config::RegistryConfig;
pub use context::AppContext;
pub use error::{RegistryError, RegistryResult};
pub use registry::CreatorRegistry;
