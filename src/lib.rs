//! Core library for the product catalog application.
//!
//! This crate exposes the domain model, catalog client, persistence adapter,
//! forms and product store consumed by the application entry point.

pub mod client;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod store;
