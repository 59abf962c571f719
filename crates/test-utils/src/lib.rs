// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for clausal
//!
//! This crate provides common testing components including:
//! - An in-memory join graph resolver with a builder
//! - A standard users/posts/comments schema loaded from YAML
//! - Statement-shape assertions

pub mod assertions;
pub mod fixtures;
pub mod mock_join_graph;

// Re-exports for convenience
pub use assertions::AstAssertions;
pub use fixtures::{load_schema, FixtureError, SchemaFixtures};
pub use mock_join_graph::{MockJoinGraph, MockJoinGraphResolver, MockJoinGraphResolverBuilder};
