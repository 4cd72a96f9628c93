//! Infrastructure adapters.
//!
//! Outbound: Asana and Intercom REST clients implementing the ports, mapping
//! errors to DomainError. Inbound: the axum HTTP surface.

pub mod http;
pub mod integrations;
