//! Credential contracts consumed by the dispatcher: the identity provider seam, the slot holding
//! the current provider, and the redacted token/subject types it hands out.

pub mod credential;
pub mod id;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use secret::*;
