//! Platform profile registry and engine tunables.
//!
//! Built-in profiles come from [`registry::builtin_profile`]; the loader layers
//! YAML files, environment variables and CLI overrides on top and records
//! where every effective value came from.

pub mod api;
pub mod defaults;
pub mod errors;
pub mod loader;
pub mod model;
pub mod registry;

pub use api::apply_override_to_snapshot;
pub use defaults::default_snapshot;
pub use errors::PolicyError;
pub use loader::{load_snapshot, load_snapshot_with_options, LoadOptions};
pub use model::{
    AdvanceKey, AdvanceMethod, EngineTunables, IdentitySource, PlatformProfile, PolicySnapshot,
    PolicySource, PolicyView,
};
pub use registry::builtin_profile;
