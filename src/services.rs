pub mod account;
pub use account::AccountService;
pub mod identity;
pub use identity::{GotrueIdentityProvider, IdentityProvider, TokenIdentity};
