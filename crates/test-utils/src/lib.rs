// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for unified-sql-query
//!
//! This crate provides common testing components including:
//! - A mock executor that records statements and answers with canned results
//! - Compiled-statement assertions (placeholder/parameter agreement, diagnostics)
//! - IR fixtures shared by integration tests

pub mod assertions;
pub mod fixtures;
pub mod mock_executor;

// Re-exports for convenience
pub use assertions::SqlAssertions;
pub use fixtures::IrFixtures;
pub use mock_executor::MockExecutor;
