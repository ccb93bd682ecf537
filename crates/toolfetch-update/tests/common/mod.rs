//! Common test infrastructure for toolfetch-update tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Tags, asset names, test payloads
//! - `builders`: Release JSON and runtime config builders
//! - `mock_server`: Wiremock setup helpers
//! - `fixtures`: Zip archives, JSONP catalogs and a recording progress observer

// Not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod fixtures;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use fixtures::*;
pub use mock_server::*;
