// ── Domain model ──

pub mod router;
pub mod status;

pub use router::{BgpNeighbor, DEFAULT_INTERFACES, Router};
pub use status::{Indicator, LinkState, RouterStatus};
