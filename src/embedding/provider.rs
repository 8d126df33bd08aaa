use crate::error::EmbedError;

/// Turns text into fixed-dimension unit vectors.
///
/// Implementations return one vector per input, in input order, and must be
/// deterministic for identical input within a process. A provider is built
/// once and shared read-only across requests.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}

/// Dot product over the shared prefix. On unit vectors this is cosine similarity.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit L2 norm in place. A zero vector is left as is.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_gives_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((dot(&v, &v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_stays_zero() {
        let mut v = vec![0.0; 4];
        normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
