//! Service Module - Classification Service Boundary

pub mod client;

pub use client::{ClassifierClient, HealthResponse, ServiceConfig, ServiceError};
