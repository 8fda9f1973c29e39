//! Filesystem-backed vault implementation.
//! Payloads land as plain text files; confidentiality comes from the
//! caller encrypting before write, not from the storage layer.

pub mod file_vault;
