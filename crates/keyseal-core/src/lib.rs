//! Core abstractions for keyseal: the vault storage contract and the
//! collision-resistant entry naming scheme.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod vault;
