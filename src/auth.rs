//! Admin authentication: password hashing, the session cookie and the
//! login/logout routes.

pub mod login;
pub mod models;
pub mod password;
pub mod session;
