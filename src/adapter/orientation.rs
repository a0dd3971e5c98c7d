//! Pitch decoding from `[w, x, y, z]` orientation quaternions
//!
//! The two decoders assume different axis conventions and give different
//! angles away from small rotations. Each model picks the one matching how its
//! solver exports orientation; they must not be swapped.

/// How a quaternion dataset is turned into a pitch angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuaternionDecode {
    /// xyz Cardan pitch: `atan2(2(wy - xz), 1 - 2(y² + z²))`
    Cardan,
    /// Pitch from the equivalent rotation matrix:
    /// `atan2(-r20, hypot(r00, r10))` with `r20 = 2(xz - wy)`,
    /// `r00 = 1 - 2(y² + z²)`, `r10 = 2(xy + wz)`
    RotationMatrix,
}

impl QuaternionDecode {
    /// Decode one quaternion row
    pub fn pitch(self, q: [f64; 4]) -> f64 {
        match self {
            QuaternionDecode::Cardan => cardan_pitch(q),
            QuaternionDecode::RotationMatrix => rotation_matrix_pitch(q),
        }
    }

    /// Whether a dataset with `cols` columns can be decoded
    pub fn accepts_width(self, cols: usize) -> bool {
        match self {
            QuaternionDecode::Cardan => cols >= 4,
            QuaternionDecode::RotationMatrix => cols == 4,
        }
    }
}

/// xyz Cardan pitch of a (possibly unnormalised) quaternion
pub fn cardan_pitch(q: [f64; 4]) -> f64 {
    let [w, x, y, z] = normalize(q);
    (2.0 * (w * y - x * z)).atan2(1.0 - 2.0 * (y * y + z * z))
}

/// Pitch extracted through the rotation-matrix elements of a quaternion
pub fn rotation_matrix_pitch(q: [f64; 4]) -> f64 {
    let [w, x, y, z] = normalize(q);
    let r20 = 2.0 * (x * z - w * y);
    let r00 = 1.0 - 2.0 * (y * y + z * z);
    let r10 = 2.0 * (x * y + w * z);
    (-r20).atan2(r00.hypot(r10))
}

/// Unit quaternion; zero or non-finite norms are passed through unchanged
fn normalize(q: [f64; 4]) -> [f64; 4] {
    let norm = q.iter().map(|c| c * c).sum::<f64>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        q.map(|c| c / norm)
    } else {
        q
    }
}
