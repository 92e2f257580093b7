//! Handler modules for the WebSocket endpoint.

pub mod websocket;

pub use websocket::websocket_handler;
