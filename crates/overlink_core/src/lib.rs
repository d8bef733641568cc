//! Overlink Core - shared primitives
//!
//! Small building blocks used by every other Overlink crate.
//!
//! # Features
//!
//! - Injectable [`Clock`] so timestamps are deterministic under test
//! - Bounded [`AuditLog`] that drops its oldest entries
//! - Insertion-ordered [`OrderedMap`] used by every id-keyed registry
//!
//! # Example
//!
//! ```ignore
//! use overlink_core::prelude::*;
//!
//! let clock = FixedClock::epoch();
//! let mut audit = AuditLog::new(100);
//! audit.record(&clock, "Registered asset lineage: grid_texture");
//! ```

pub mod audit;
pub mod clock;
pub mod registry;

pub mod prelude {
    pub use crate::audit::{AuditLog, DEFAULT_AUDIT_CAPACITY};
    pub use crate::clock::{Clock, FixedClock, SharedClock, SystemClock};
    pub use crate::registry::OrderedMap;
}

pub use prelude::*;
