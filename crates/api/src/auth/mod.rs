//! Authentication: JWT session tokens and password verification for the
//! single admin account.

pub mod jwt;
pub mod password;
