//! # HRM API
//! 
//! HTTP handlers, DTOs and the router for the permission back-office.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
