//! Leadflow CRM API Library
//!
//! This library provides the core functionality for the Leadflow
//! lead-generation CRM backend: candidate scoring, deduplicated ingestion,
//! crawl-session tracking, lead/campaign storage and the HTTP handlers.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `config`: Configuration management.
//! - `crawler`: Candidate sources (stub acquisition).
//! - `db`: Database connection and pool management.
//! - `db_storage`: Database storage operations.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `ingest`: Deduplication and ingestion coordinator.
//! - `models`: Core data models.
//! - `scoring`: Lead quality scoring engine.

pub mod api;
pub mod core;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod crawler;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod scoring;
