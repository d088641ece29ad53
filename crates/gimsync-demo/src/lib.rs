//! Demo frontend for the group state engine.
//!
//! Runs the production [`gimsync_app::Runtime`] against an in-process
//! backend that simulates a small group playing, encoded in the backend's
//! wire format and decoded by [`gimsync_core::decode_group_update`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
pub mod demo_driver;
pub mod error;
pub mod system_env;

pub use backend::DemoBackend;
pub use demo_driver::DemoDriver;
pub use error::DemoError;
pub use system_env::SystemEnv;
