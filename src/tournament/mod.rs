mod elo;
mod pairing;
mod state;

pub use elo::*;
pub use pairing::*;
pub use state::*;
