// Library root: domain types, stat normalization, comparison aggregation,
// the ESPN clients and the session reducer. No terminal code lives here.

pub mod api;
pub mod compare;
pub mod config;
pub mod player;
pub mod session;
pub mod stats;
