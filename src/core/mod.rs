pub mod backup;
pub mod clock;
pub mod config;
pub mod locks;
pub mod log;
pub mod login;
pub mod recorder;
pub mod scan;
pub mod stats;
pub mod validator;
