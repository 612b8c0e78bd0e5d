pub mod attendance;
pub mod session;
pub mod token;
