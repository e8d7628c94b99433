//! # Chat Relay Library
//!
//! This crate provides a real-time multi-user chat relay:
//! - WebSocket transport, one persistent channel per client
//! - In-memory session registry (connection -> display name)
//! - Broadcast dispatcher for chat, presence, and call-signaling events
//! - Static asset serving as a zero-logic fallback
//!
//! ## Module Structure
//!
//! ```text
//! chat_relay/
//! +-- config/      Configuration management
//! +-- relay/       Session registry, wire protocol, broadcast dispatcher
//! +-- routes       Router: /ws, /health, static fallback
//! +-- ws           WebSocket upgrade and per-connection socket loop
//! +-- startup      Application state and server initialization
//! +-- telemetry    Structured logging setup
//! ```

// Configuration module
pub mod config;

// Domain core - registry, protocol, dispatcher
pub mod relay;

// Router and health endpoint
pub mod routes;

// WebSocket transport layer
pub mod ws;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
