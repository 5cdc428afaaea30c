//! Integration test suite for updraft
//!
//! End-to-end tests covering the CLI surface and full update cycles over
//! mock collaborators. No test here touches the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli_surface**: Argument parsing and help/error output of the binary
//! - **full_cycle**: Complete update cycles through the library API

mod cli_surface;
mod full_cycle;
