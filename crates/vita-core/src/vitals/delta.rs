use rand::Rng;

/// Source of bounded random perturbations
pub trait DeltaSource: Send + Sync {
    /// Value in `[min, max]` rounded to `decimals` places
    fn next_delta(&self, min: f64, max: f64, decimals: u32) -> f64;
}

/// Uniform deltas from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDelta;

impl DeltaSource for RandomDelta {
    fn next_delta(&self, min: f64, max: f64, decimals: u32) -> f64 {
        // gen_range panics on empty or non-finite ranges
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return round_to(min, decimals);
        }

        let value = rand::thread_rng().gen_range(min..=max);
        round_to(value, decimals)
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
