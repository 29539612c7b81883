pub mod claims;
pub mod jwt;

pub use claims::{SessionClaims, VerifiedIdentity};
pub use jwt::{verify_session_token, verify_token_subject, TokenRejection};
