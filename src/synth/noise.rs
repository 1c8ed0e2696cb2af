//! Uniform noise helpers shared by the waveform generators
//! Location: src/synth/noise.rs

use rand::Rng;

/// Uniform sample in `[-half_width, half_width)`
pub fn symmetric<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> f32 {
    if half_width <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half_width..half_width)
}

/// Substitute `fallback` for NaN and infinities
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_symmetric_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let n = symmetric(&mut rng, 0.35);
            assert!((-0.35..0.35).contains(&n));
        }
    }

    #[test]
    fn test_zero_width_is_silent() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(symmetric(&mut rng, 0.0), 0.0);
        assert_eq!(symmetric(&mut rng, -1.0), 0.0);
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(finite_or(f32::NAN, 3.0), 3.0);
        assert_eq!(finite_or(f32::INFINITY, 3.0), 3.0);
        assert_eq!(finite_or(2.5, 3.0), 2.5);
    }
}
