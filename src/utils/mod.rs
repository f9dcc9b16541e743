pub mod clock;
pub mod id_generator;

pub use clock::{Clock, SystemClock};
pub use id_generator::{KeyGenerator, RandomKeyGenerator};
