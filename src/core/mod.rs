//! Domain logic that is not tied to storage: intake text assembly, session
//! tokens and the upstream API clients.

pub mod detection;
pub mod fda;
pub mod intake;
pub mod reddit;
pub mod session;
