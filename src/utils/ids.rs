//! Step id generation helpers.
//!
//! The compiler never invents ids on its own: callers inject an
//! [`IdFactory`] so tests can stub id assignment and assert exact output.
//! [`uuid_factory`] is the production default; [`sequential_factory`]
//! produces `{prefix}-{n}` ids for deterministic fixtures.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::utils::ids::sequential_factory;
//!
//! let mut next_id = sequential_factory("step");
//! assert_eq!(next_id(), "step-1");
//! assert_eq!(next_id(), "step-2");
//! ```

use uuid::Uuid;

/// Caller-injected id source. The only non-determinism in the engine.
pub type IdFactory = Box<dyn FnMut() -> String>;

/// Production default: random v4 uuids.
#[must_use]
pub fn uuid_factory() -> IdFactory {
    Box::new(|| Uuid::new_v4().to_string())
}

/// Deterministic factory for tests and fixtures: `{prefix}-1`, `{prefix}-2`, ...
#[must_use]
pub fn sequential_factory(prefix: &str) -> IdFactory {
    let prefix = prefix.to_owned();
    let mut counter = 0u64;
    Box::new(move || {
        counter += 1;
        format!("{prefix}-{counter}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_stable() {
        let mut a = sequential_factory("s");
        let mut b = sequential_factory("s");
        assert_eq!(a(), b());
        assert_eq!(a(), b());
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut f = uuid_factory();
        assert_ne!(f(), f());
    }
}
