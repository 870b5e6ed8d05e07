//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes submission events to viewers
//! that subscribed to the `submissions` topic, optionally followed by a
//! refreshed aggregate snapshot.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
