//! In-memory task tracker: an HTTP/JSON task server and a terminal client.
//!
//! The server side is [`store`] behind [`api`]; the client side is
//! [`client`], [`form`], [`board`] and [`ui`]. Status is always derived from
//! the due date, see [`status`].

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod form;
pub mod logging;
pub mod status;
pub mod store;
pub mod task;
pub mod ui;
