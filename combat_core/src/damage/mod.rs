//! Damage resolver - stateless hit calculation
//!
//! Order of operations is fixed:
//! 1. base = attacker stat * potency * enrage (* elemental bonus)
//! 2. elemental affinity multiplier
//! 3. flat elemental resistance
//! 4. defense mitigation (armor for physical, magic resist otherwise)
//! 5. crit multiplier
//! 6. round, floor at 0
//!
//! Dodge is checked before the pipeline and short-circuits to zero.

mod request;
mod resolver;

pub use request::HitRequest;
pub use resolver::{estimate, resolve, HitResult};
