mod timestamp;
pub use timestamp::*;

mod channel;
pub use channel::*;
