//! In-memory adapters.
//!
//! - `InMemoryStore` - every storage port over a single locked state
//! - `SystemClock` / `FixedClock` - clock implementations

mod clock;
mod store;

pub use clock::{FixedClock, SystemClock};
pub use store::{FailPoint, InMemoryStore, InMemoryTransaction};
