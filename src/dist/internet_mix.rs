use rand::{Rng, RngCore};

/// Approximate mean of [`internet_mix`] in bytes.
pub const INTERNET_MIX_MEAN_BYTES: f64 = 438.5;

/// Draws a packet size from an empirical Internet mix.
///
/// 50% 40 B, 13% spread over 40..575 B, 17% 576 B, 3% spread over
/// 576..1499 B, 17% 1500 B.
pub fn internet_mix(rng: &mut dyn RngCore) -> f64 {
    let ds: f64 = rng.r#gen();
    if ds <= 0.5 {
        40.0
    } else if ds <= 0.63 {
        (((ds - 0.5) / 0.13) * (575.0 - 40.0) + 40.0).round()
    } else if ds <= 0.80 {
        576.0
    } else if ds <= 0.83 {
        (((ds - 0.80) / 0.03) * (1499.0 - 576.0) + 576.0).round()
    } else {
        1500.0
    }
}
