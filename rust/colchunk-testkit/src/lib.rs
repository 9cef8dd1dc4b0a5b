//! Test utilities for the colchunk crates.
//!
//! This crate provides synthetic column fragment generation for exercising chunk
//! encodings, and is intended for use as a dev-dependency only.

pub mod data_gen;
