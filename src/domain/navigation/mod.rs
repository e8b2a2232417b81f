//! Navigation module - screens, transition table and the navigator.
//!
//! - `screen` - `ScreenKey` and the flow each screen belongs to
//! - `registry` - forward/back/cancel edges and entry preconditions
//! - `policy` - behaviour when a profile type is required but unset
//! - `navigator` - intent dispatch over the profile and the registry

mod errors;
mod navigator;
mod policy;
mod registry;
mod screen;

pub use errors::NavigationError;
pub use navigator::{NavigationIntent, NavigationOutcome, Navigator, NavigatorPhase};
pub use policy::{MissingPreconditionPolicy, NavigationPolicy};
pub use registry::{Precondition, ResolvedScreen, ScreenRegistry};
pub use screen::{ScreenFlow, ScreenKey};
