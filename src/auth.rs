//! Credential models and the three-token store.

pub mod credentials;
pub mod secret;
pub mod token_store;

pub use credentials::*;
pub use secret::*;
pub use token_store::*;
