//! Client-side controller for the course materials chat assistant.
//!
//! The controllers ([`session::SessionController`], [`theme::ThemeController`],
//! [`dispatch::InputDispatcher`]) are plain state machines with no rendering
//! dependency; the Dioxus shell in [`ui`] wires them to the page when the
//! `ui` feature is enabled.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod render;
pub mod session;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod transcript;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
