mod board;
mod hypothesis;
mod proximity;
mod review;
mod stats;

pub use board::*;
pub use hypothesis::*;
pub use proximity::*;
pub use review::*;
pub use stats::*;
