//! Auth-domain identifiers, credentials, and token models.

pub mod credential;
pub mod token;

pub use credential::*;
pub use token::*;
