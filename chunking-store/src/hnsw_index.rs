use hnsw_rs::prelude::*;

/// In-memory HNSW graph (cosine distance) over the vectors of one collection.
///
/// Labels are positions in the row list the graph was built from. HNSW has no delete, so the
/// graph is rebuilt from scratch whenever the collection is replaced.
pub struct HnswIndex {
    dim: usize,
    hnsw: Hnsw<'static, f32, DistCosine>,
    len: usize,
}

impl HnswIndex {
    pub fn new(dim: usize, expected: usize) -> Self {
        let max_nb_conn = 16;
        let ef_c = 200;
        let num_layers = 16;
        let hnsw = Hnsw::<f32, DistCosine>::new(max_nb_conn, expected.max(1000), num_layers, ef_c, DistCosine {});
        Self { dim, hnsw, len: 0 }
    }

    /// Build a graph whose label `i` is `vectors[i]`. Vectors of the wrong dimension are skipped.
    pub fn build<'a, I>(dim: usize, vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a [f32]>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = vectors.into_iter();
        let mut index = Self::new(dim, iter.len());
        for (label, v) in iter.enumerate() {
            index.insert(label, v);
        }
        index
    }

    pub fn insert(&mut self, label: usize, v: &[f32]) {
        if v.len() != self.dim {
            return;
        }
        self.hnsw.insert((v, label));
        self.len += 1;
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Up to `top_k` (label, similarity) pairs, most similar first.
    pub fn knn(&self, query: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        if query.len() != self.dim || top_k == 0 || self.len == 0 {
            return Vec::new();
        }
        let ef_s = top_k.saturating_mul(10).max(64);
        let mut out: Vec<(usize, f32)> = self
            .hnsw
            .search(query, top_k, ef_s)
            .into_iter()
            // cosine distance (smaller is better)
            .map(|n| (n.d_id, 1.0f32 - n.distance))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out.truncate(top_k);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_vector_comes_first() {
        let vectors: Vec<Vec<f32>> = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.7, 0.7, 0.0]];
        let index = HnswIndex::build(3, vectors.iter().map(|v| v.as_slice()));
        assert_eq!(index.len(), 3);
        let hits = index.knn(&[0.0, 1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 1);
        assert_eq!(hits[1].0, 2);
    }

    #[test]
    fn wrong_dimension_query_returns_nothing() {
        let index = HnswIndex::build(2, [[1.0f32, 0.0]].iter().map(|v| v.as_slice()));
        assert!(index.knn(&[1.0, 0.0, 0.0], 1).is_empty());
    }
}
