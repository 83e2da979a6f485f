pub struct SearchEngine;

impl SearchEngine {
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }

    /// `1 - cosine similarity`: 0 for identical direction, 2 for opposite.
    pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        1.0 - Self::cosine_similarity(a, b)
    }

    /// Indices and distances of the `top_k` closest candidates, nearest
    /// first. Equal distances keep candidate order.
    pub fn nearest<'a, I>(query: &[f32], candidates: I, top_k: usize) -> Vec<(usize, f32)>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut distances: Vec<(usize, f32)> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i, Self::cosine_distance(query, v)))
            .collect();
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));
        distances.truncate(top_k);
        distances
    }
}
