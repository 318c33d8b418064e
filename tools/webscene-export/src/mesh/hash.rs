//! Structural hash for vertex attribute tuples
//!
//! RS-style multiplicative hash over each component quantized to thousandths.
//! Equal tuples always hash equally; distinct tuples may collide, which the
//! dedup table resolves with an exact comparison. Values are never persisted.

const SEED_A: u32 = 378_551;
const SEED_B: u32 = 63_689;

/// Hash a sequence of float components.
pub fn structural_hash(components: &[f32]) -> u32 {
    let mut a = SEED_A;
    let mut hash = 0u32;
    for &c in components {
        // Truncating cast: saturates on overflow, NaN becomes 0, -0.0 becomes 0
        let quantized = (f64::from(c) * 1000.0) as i64;
        hash = hash.wrapping_mul(a).wrapping_add(quantized as u32);
        a = a.wrapping_mul(SEED_B);
    }
    hash
}
