mod agent;
mod evolution;
mod generation;
mod meta_review;
mod parse;
mod proximity;
mod ranking;
mod reflection;

pub use agent::*;
pub use evolution::*;
pub use generation::*;
pub use meta_review::*;
pub use parse::*;
pub use proximity::*;
pub use ranking::*;
pub use reflection::*;

use crate::blackboard::HypothesisId;
use rand::rngs::SmallRng;

/// deterministic random stream for one (run seed, salt) pair
pub(crate) fn stream(seed: u64, salt: &str) -> SmallRng {
    use rand::SeedableRng;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;
    let ref mut hasher = DefaultHasher::new();
    seed.hash(hasher);
    salt.hash(hasher);
    SmallRng::seed_from_u64(hasher.finish())
}

/// stamp a fresh hypothesis id
pub(crate) fn mint(rng: &mut SmallRng) -> HypothesisId {
    use rand::Rng;
    format!("h-{:016x}", rng.random::<u64>())
}
