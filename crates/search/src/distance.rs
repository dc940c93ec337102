//! Distance kernel
//!
//! Ranking uses squared Euclidean distance. The square root is monotonic, so
//! skipping it leaves the order unchanged and keeps it off the scan path.

/// Squared Euclidean distance: `Σ_j (a[j] - b[j])²`.
///
/// Processes four lanes per iteration so the compiler can vectorize the loop.
#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = a[base] - b[base];
        let d1 = a[base + 1] - b[base + 1];
        let d2 = a[base + 2] - b[base + 2];
        let d3 = a[base + 3] - b[base + 3];
        sum += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
    }

    for i in (chunks * 4)..a.len() {
        let d = a[i] - b[i];
        sum += d * d;
    }

    sum
}
