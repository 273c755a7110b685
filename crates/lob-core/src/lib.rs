//! # lob-core
//!
//! Core types, workload generation, and filesystem helpers for lobprobe.
//!
//! This crate provides the pieces shared by every lobprobe scenario:
//! - Entity structs for the seeded relational data (sources, points, tags)
//!   and the blob payload row
//! - The Counter Map workload and its opaque binary codec
//! - The human-readable size ladder used by the growth report
//! - Working-directory reset and fixture placement
//! - Report types printed by the `lobprobe` binary
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod responses;
pub mod size;
pub mod workload;
pub mod workspace;
