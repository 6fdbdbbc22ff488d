//! Authentication: credential token storage, identity claims and the session gate.

pub mod claims;
pub mod session;
pub mod token_store;

pub use claims::{ClaimsError, IdentityClaims, Role, decode_claims};
pub use session::{Guard, SessionGate, SessionState, mask_token};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
