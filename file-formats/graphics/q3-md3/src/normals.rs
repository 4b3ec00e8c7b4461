//! Shared lookup table for the two-byte MD3 normal encoding
//!
//! Each vertex stores its normal as a pair of angle indices. The table maps
//! every pair to a unit vector; it is built once per process and then only
//! read, so every decoded model can share the same instance.

use glam::Vec3;
use std::f64::consts::TAU;
use std::sync::OnceLock;

/// Number of steps per angle
pub const NORMAL_STEPS: usize = 256;

static TABLE: OnceLock<NormalTable> = OnceLock::new();

/// Precomputed 256 x 256 unit vectors
#[derive(Clone)]
pub struct NormalTable {
    normals: Vec<Vec3>,
}

impl std::fmt::Debug for NormalTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalTable")
            .field("entries", &self.normals.len())
            .finish()
    }
}

impl NormalTable {
    /// Build a fresh table.
    ///
    /// For indices `(i, j)` the angles are `alpha = i * 2pi / 255` and
    /// `beta = j * 2pi / 255`, giving
    /// `(cos beta * sin alpha, sin beta * sin alpha, cos alpha)`.
    pub fn build() -> Self {
        let mut normals = Vec::with_capacity(NORMAL_STEPS * NORMAL_STEPS);
        for i in 0..NORMAL_STEPS {
            let alpha = i as f64 * TAU / 255.0;
            for j in 0..NORMAL_STEPS {
                let beta = j as f64 * TAU / 255.0;
                normals.push(Vec3::new(
                    (beta.cos() * alpha.sin()) as f32,
                    (beta.sin() * alpha.sin()) as f32,
                    alpha.cos() as f32,
                ));
            }
        }
        Self { normals }
    }

    /// Look up an encoded normal
    pub fn decode(&self, encoded: [u8; 2]) -> Vec3 {
        self.normals[usize::from(encoded[0]) * NORMAL_STEPS + usize::from(encoded[1])]
    }
}

/// The process-wide table, built on first use.
///
/// Calling this any number of times, from any thread, yields the same table.
pub fn init() -> &'static NormalTable {
    TABLE.get_or_init(|| {
        log::debug!("Building {NORMAL_STEPS}x{NORMAL_STEPS} normal lookup table");
        NormalTable::build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_init_is_idempotent() {
        let a = init();
        let b = init();
        assert!(std::ptr::eq(a, b));
    }

    #[test_case([0, 0], Vec3::Z ; "pole")]
    #[test_case([255, 0], Vec3::Z ; "full turn wraps to pole")]
    #[test_case([64, 0], Vec3::new(0.99998, 0.0, -0.00617) ; "near equator")]
    fn test_known_entries(encoded: [u8; 2], expected: Vec3) {
        let n = init().decode(encoded);
        assert!((n - expected).length() < 1e-3, "{n:?} != {expected:?}");
    }

    #[test]
    fn test_every_entry_is_unit_length() {
        let table = init();
        for i in 0..=255u8 {
            for j in (0..=255u8).step_by(17) {
                let len = table.decode([i, j]).length();
                assert!((len - 1.0).abs() < 1e-5);
            }
        }
    }
}
