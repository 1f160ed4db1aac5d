//! Background parallax scroll.

use skyraid_core::constants::{AUTHORED_FRAME_RATE, PARALLAX_RATES};

/// Tile offsets of the seven background layers, back to front.
#[derive(Debug, Clone, Default)]
pub struct Parallax {
    offsets: [f64; PARALLAX_RATES.len()],
}

impl Parallax {
    /// Scroll every layer by its rate for one tick.
    pub fn advance(&mut self, dt_secs: f64) {
        for (offset, rate) in self.offsets.iter_mut().zip(PARALLAX_RATES) {
            *offset += rate * AUTHORED_FRAME_RATE * dt_secs;
        }
    }

    pub fn offsets(&self) -> Vec<f64> {
        self.offsets.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_of_scroll() {
        let mut parallax = Parallax::default();
        for _ in 0..50 {
            parallax.advance(0.02);
        }
        let offsets = parallax.offsets();
        assert_eq!(offsets.len(), 7);
        // Front layer: 1.2 px per frame at 60 frames per second.
        assert!((offsets[6] - 72.0).abs() < 1e-9);
        assert!((offsets[0] - 12.0).abs() < 1e-9);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }
}
