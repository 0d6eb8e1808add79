//! Status page service.
//!
//! This module handles:
//! - Runtime facts gathered per request
//! - The optional peer call
//! - HTML rendering and routing

pub mod facts;
pub mod handlers;
pub mod page;
pub mod peer;
pub mod routes;

pub use facts::EnvironmentFacts;
pub use handlers::{DisplaySource, StatusState};
pub use page::PeerStatus;
pub use peer::PeerClient;
pub use routes::create_router;
