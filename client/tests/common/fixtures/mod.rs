//! This module provides reusable test utilities:
//! - Mock Arc API server
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_arc;
pub mod test_data;

// Re-export commonly used items
pub use mock_arc::MockArcServer;
pub use test_data::*;
