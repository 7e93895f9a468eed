//! Dense vector kernels with SIMD dispatch.
//!
//! These are the unchecked primitives under [`crate::similarity`]:
//! mismatched lengths are truncated to the shorter slice, never reported.
//! Dimension checks belong to the caller.
//!
//! Dispatch:
//! - AVX2+FMA on `x86_64` (runtime detection)
//! - NEON on `aarch64`
//! - Portable fallback otherwise
//!
//! The dispatch decision is fixed per process, so repeated calls on the same
//! inputs return bit-identical results. Selection determinism relies on that.

/// Dot product over the common prefix of `a` and `b`.
///
/// Returns 0.0 when either slice is empty.
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            // SAFETY: AVX2 and FMA were detected at runtime, and the kernel
            // only reads within min(a.len(), b.len()).
            return unsafe { dot_avx2(a, b) };
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: NEON is baseline on aarch64; the kernel stays in bounds.
        return unsafe { dot_neon(a, b) };
    }
    #[allow(unreachable_code)]
    dot_portable(a, b)
}

/// L2 norm.
#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Cosine similarity without a length check.
///
/// Zero-magnitude input yields 0.0 instead of NaN. The result is clamped to
/// `[-1, 1]` so rounding never pushes a self-similarity above one.
///
/// Vectors whose squared magnitudes overflow or underflow `f32` (components
/// beyond roughly `1e19` or below `1e-19`) are rescored in `f64`, so very
/// large or very small finite input still gets its true direction.
#[inline]
#[must_use]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let denom = norm(a) * norm(b);
    let d = dot(a, b);
    if denom.is_normal() && d.is_finite() {
        (d / denom).clamp(-1.0, 1.0)
    } else {
        cosine_wide(a, b)
    }
}

/// `f64` cosine for inputs out of `f32` range. Squares of any finite `f32`
/// are representable in `f64`, so only true zero vectors score 0 here.
#[cold]
fn cosine_wide(a: &[f32], b: &[f32]) -> f32 {
    let sq = |v: &[f32]| v.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>();
    let d: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let denom = sq(a).sqrt() * sq(b).sqrt();
    if denom > 0.0 && denom.is_finite() {
        (d / denom).clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Scalar reference kernel.
#[inline]
#[must_use]
pub(crate) fn dot_portable(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2,fma")]
unsafe fn dot_avx2(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::x86_64::{
        _mm256_add_ps, _mm256_fmadd_ps, _mm256_loadu_ps, _mm256_setzero_ps, _mm256_storeu_ps,
    };

    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    // Two accumulators hide FMA latency.
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();
    let mut blocks_a = a.chunks_exact(16);
    let mut blocks_b = b.chunks_exact(16);
    for (xa, xb) in (&mut blocks_a).zip(&mut blocks_b) {
        // SAFETY: each block holds exactly 16 floats, so both 8-lane loads
        // (offsets 0 and 8) are in bounds.
        acc0 = _mm256_fmadd_ps(
            _mm256_loadu_ps(xa.as_ptr()),
            _mm256_loadu_ps(xb.as_ptr()),
            acc0,
        );
        acc1 = _mm256_fmadd_ps(
            _mm256_loadu_ps(xa.as_ptr().add(8)),
            _mm256_loadu_ps(xb.as_ptr().add(8)),
            acc1,
        );
    }

    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), _mm256_add_ps(acc0, acc1));
    let head: f32 = lanes.iter().sum();

    head + dot_portable(blocks_a.remainder(), blocks_b.remainder())
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn dot_neon(a: &[f32], b: &[f32]) -> f32 {
    use std::arch::aarch64::{vaddvq_f32, vdupq_n_f32, vfmaq_f32, vld1q_f32};

    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let mut acc = vdupq_n_f32(0.0);
    let mut blocks_a = a.chunks_exact(4);
    let mut blocks_b = b.chunks_exact(4);
    for (xa, xb) in (&mut blocks_a).zip(&mut blocks_b) {
        // SAFETY: each block holds exactly 4 floats.
        acc = vfmaq_f32(acc, vld1q_f32(xa.as_ptr()), vld1q_f32(xb.as_ptr()));
    }

    vaddvq_f32(acc) + dot_portable(blocks_a.remainder(), blocks_b.remainder())
}
