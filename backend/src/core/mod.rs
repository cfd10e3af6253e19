//! Ambient collaborators consumed by the engine: wall clock, id generation and
//! calendar arithmetic.

pub mod calendar;
pub mod clock;
pub mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
