//! llm-console - terminal client for an LLM inference proxy
//!
//! The proxy routes prompts to a fast or an accurate model and records every
//! call. This library holds the pieces of the console built on top of it:
//!
//! - [`api`] - wire types and endpoint paths
//! - [`client`] - the [`client::ProxyApi`] seam and its HTTP implementation
//! - [`session`] - the session controller: submission, refresh, and polling
//! - [`view`] - pure projection of session state into displayable values
//! - [`config`], [`logging`], [`cli`] - the ambient console plumbing

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod session;
pub mod view;
