use rand::Rng;

/// Synthetic popularity figures attached to a tool on every response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popularity {
    /// In [3.0, 5.0], one decimal place.
    pub rating: f64,
    /// In [5, 54].
    pub review_count: u32,
    /// True with probability 0.6.
    pub is_free: bool,
}

impl Popularity {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let raw: f64 = rng.gen_range(3.0..=5.0);
        Popularity {
            rating: ((raw * 10.0).round() / 10.0).clamp(3.0, 5.0),
            review_count: rng.gen_range(5..55),
            is_free: rng.gen_bool(0.6),
        }
    }
}

/// Source of popularity figures. Handlers take it from `AppState` so tests
/// can swap in a deterministic implementation.
pub trait PopularitySource: Send + Sync {
    fn sample(&self) -> Popularity;
}

/// Draws from the thread-local RNG; no memory between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPopularity;

impl PopularitySource for RandomPopularity {
    fn sample(&self) -> Popularity {
        Popularity::generate(&mut rand::thread_rng())
    }
}

/// Always returns the same figures.
#[derive(Debug, Clone, Copy)]
pub struct FixedPopularity(pub Popularity);

impl PopularitySource for FixedPopularity {
    fn sample(&self) -> Popularity {
        self.0
    }
}
