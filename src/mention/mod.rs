//! Backlink reconciliation
//!
//! The verifier hands over `(source, target, parsed source page)`. The raw
//! payload is always logged; when the target is a single-entry page of this
//! site, the originating `h-entry` is attached to that entry.

mod indexer;
mod routes;

pub use indexer::{MentionIndexer, MentionOutcome};
pub use routes::{Route, RouteResolver, SiteRoutes};
