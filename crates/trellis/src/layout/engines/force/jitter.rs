//! Randomness used to separate coincident bodies.

use rand::{
    Rng, SeedableRng,
    rngs::{StdRng, ThreadRng},
};

use trellis_core::geometry::Point;

/// Largest jitter displacement along either axis.
const JITTER_MAGNITUDE: f32 = 1.0;

/// A source of small displacements.
///
/// Two bodies whose centers nearly coincide have no meaningful repulsion
/// direction; the simulation asks a `Jitter` for one instead. Closures
/// returning a [`Point`] implement this trait, which makes it easy to inject
/// a fixed displacement in tests.
pub trait Jitter {
    /// Returns a displacement with components in `[-1, 1]`.
    fn nudge(&mut self) -> Point;
}

impl<F> Jitter for F
where
    F: FnMut() -> Point,
{
    fn nudge(&mut self) -> Point {
        self()
    }
}

/// [`Jitter`] backed by a [`rand`] generator.
#[derive(Debug, Clone)]
pub struct RandomJitter<R> {
    rng: R,
}

impl RandomJitter<ThreadRng> {
    /// Draws from the thread-local generator; results differ between runs.
    pub fn thread_local() -> Self {
        Self { rng: rand::rng() }
    }
}

impl RandomJitter<StdRng> {
    /// Draws from a generator seeded with `seed`; results are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn nudge(&mut self) -> Point {
        Point::new(
            self.rng.random_range(-JITTER_MAGNITUDE..=JITTER_MAGNITUDE),
            self.rng.random_range(-JITTER_MAGNITUDE..=JITTER_MAGNITUDE),
        )
    }
}
