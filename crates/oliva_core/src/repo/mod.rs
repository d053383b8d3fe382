//! Notebook persistence adapters.
//!
//! # Responsibility
//! - Define the storage contract used to load and save whole notebooks.
//! - Keep JSON and filesystem details out of the model and services.
//!
//! # Invariants
//! - Every load path parses and validates through one routine, so the same
//!   JSON always yields the same in-memory notebook.
//! - A loaded notebook has passed `Notebook::validate()`.

pub mod notebook_store;
