//! HTTP server for Tally.
//!
//! Exposes the roster, item catalog, attendance, and eligibility operations
//! as HTTP endpoints. Mutation bodies may be JSON or urlencoded HTML forms
//! (see [`extract`]). Mutations answer with a `303 See Other` back to `/`,
//! whose response is the full view the presentation layer renders.

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod router;
pub mod server;
pub mod view;

pub use config::{ServerConfig, TallyConfig};
pub use error::{ServerError, ServerResult};
pub use handler::SharedRoster;
pub use server::TallyServer;
pub use view::{EligibilityResponse, HealthResponse, HomeView};
