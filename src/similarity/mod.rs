//! Cosine similarity between embedding vectors.
//!
//! The engine is pure and allocation-free: one pass over both slices accumulates the
//! dot product and the two squared magnitudes in `f64`. Inputs for which cosine
//! similarity is undefined are rejected with a [`SimilarityError`] instead of
//! producing `NaN`.

pub mod error;


pub use error::{SimilarityError, VectorSide};

/// Result alias for similarity computations.
pub type SimilarityResult<T> = Result<T, SimilarityError>;

/// Computes `Σ a[i]·b[i] / (‖a‖ · ‖b‖)`.
///
/// # Errors
///
/// - [`SimilarityError::InvalidInput`] when the lengths differ, the vectors are empty,
///   a component is not finite, or the magnitudes overflow `f64`.
/// - [`SimilarityError::DegenerateVector`] when either vector has zero magnitude.
///
/// The result is clamped to `[-1, 1]` so rounding never pushes it out of range.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> SimilarityResult<f64> {
    if a.len() != b.len() {
        return Err(SimilarityError::InvalidInput {
            reason: format!("vector lengths differ: {} vs {}", a.len(), b.len()),
        });
    }

    if a.is_empty() {
        return Err(SimilarityError::InvalidInput {
            reason: "vectors are empty".to_string(),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) = a.iter().zip(b).enumerate().try_fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (index, (&av, &bv))| {
            check_finite(VectorSide::Left, index, av)?;
            check_finite(VectorSide::Right, index, bv)?;
            Ok((dot + av * bv, na + av * av, nb + bv * bv))
        },
    )?;

    if norm_a_sq == 0.0 {
        return Err(SimilarityError::DegenerateVector {
            side: VectorSide::Left,
        });
    }
    if norm_b_sq == 0.0 {
        return Err(SimilarityError::DegenerateVector {
            side: VectorSide::Right,
        });
    }

    let similarity = dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt());
    if !similarity.is_finite() {
        return Err(SimilarityError::InvalidInput {
            reason: "vector magnitudes overflow f64".to_string(),
        });
    }

    Ok(similarity.clamp(-1.0, 1.0))
}

#[inline]
fn check_finite(side: VectorSide, index: usize, value: f64) -> SimilarityResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimilarityError::InvalidInput {
            reason: format!("{side} vector has non-finite component {value} at index {index}"),
        })
    }
}
