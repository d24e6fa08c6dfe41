//! Row-major numeric matrix passed from the preprocessor to the model.

/// A dense, row-major matrix of model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// A matrix holding exactly one row
    pub fn single_row(row: Vec<f64>) -> Self {
        Self {
            n_rows: 1,
            n_cols: row.len(),
            data: row,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| {
            let start = i * self.n_cols;
            &self.data[start..start + self.n_cols]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        let m = FeatureMatrix::single_row(vec![1.0, 2.0, 3.0]);
        assert_eq!(m.n_rows(), 1);
        assert_eq!(m.n_cols(), 3);
        let rows: Vec<_> = m.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..]]);
    }

    #[test]
    fn test_zero_width_rows_do_not_panic() {
        let m = FeatureMatrix::single_row(vec![]);
        assert_eq!(m.rows().count(), 1);
        assert!(m.rows().all(|row| row.is_empty()));
    }
}
