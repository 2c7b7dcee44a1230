// ── Router storage ──

mod collection;

pub use collection::{RouterSnapshot, RouterStore};
