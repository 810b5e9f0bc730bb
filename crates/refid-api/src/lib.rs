//! HTTP surface of the identifier allocator.
//!
//! [`HttpApi`] mounts the routes on an axum [`axum::Router`]; the work is
//! delegated to an [`ApiHandler`], normally [`AllocatorApiAdapter`].
mod adapter;
mod error;
mod handler;
mod http;

pub use adapter::AllocatorApiAdapter;
pub use error::ApiError;
pub use handler::ApiHandler;
pub use http::HttpApi;
