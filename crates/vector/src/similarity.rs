use ndarray::{Array1, ArrayView1};

/// Added to the cosine denominator so zero vectors score 0 instead of NaN
pub const EPSILON: f64 = 1e-10;

/// Cosine similarity: `dot(a, b) / (‖a‖·‖b‖ + ε)`
///
/// Accumulates in `f64` and narrows the result, so large components do not
/// overflow. Vectors of different length are not comparable and score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let a = ArrayView1::from(a).mapv(f64::from);
    let b = ArrayView1::from(b).mapv(f64::from);

    (a.dot(&b) / (l2_norm(&a) * l2_norm(&b) + EPSILON)) as f32
}

fn l2_norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}
