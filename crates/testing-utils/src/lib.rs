//! # Escalator Testing Utils
//!
//! Shared testing utilities for the escalator workspace.
//!
//! ## Features
//!
//! - **Mock Collaborators**: telephony gateway, dispatch invoker and clock test doubles
//! - **Test Data Builders**: rosters, candidates and compressed outcome event batches
//! - **Test Environment**: in-memory configuration and object store seeding
//!
//! ## Usage
//!
//! ```toml
//! [dev-dependencies]
//! escalator-testing-utils = { path = "../testing-utils" }
//! ```
//!
//! ```rust
//! use escalator_testing_utils::{MockTelephonyGateway, RosterBuilder, TestEnv};
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
