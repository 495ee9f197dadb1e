/// Target shape of a sparse matrix assembled on the engine from triplets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseShape {
    /// Exactly `rows x cols`, whatever the largest stored index.
    Explicit { rows: usize, cols: usize },

    /// Let the engine infer the shape from the largest stored row and
    /// column index.  A matrix whose trailing rows or columns are empty
    /// comes out smaller than intended.
    #[deprecated(note = "pass explicit dimensions with `SparseShape::Explicit`")]
    Inferred,
}

impl SparseShape {
    /// `Explicit` unless either dimension is zero, which selects
    /// inference.
    #[allow(deprecated)]
    pub fn new(rows: usize, cols: usize) -> Self {
        if rows == 0 || cols == 0 {
            SparseShape::Inferred
        } else {
            SparseShape::Explicit { rows, cols }
        }
    }

    pub fn square(n: usize) -> Self {
        SparseShape::new(n, n)
    }

    /// The explicit dimensions, if any.
    #[allow(deprecated)]
    pub fn dims(&self) -> Option<(usize, usize)> {
        match *self {
            SparseShape::Explicit { rows, cols } => Some((rows, cols)),
            SparseShape::Inferred => None,
        }
    }

    /// Engine command converting the `nnz x 3` triplet variable `name` into
    /// a sparse matrix bound to the same name.
    pub(crate) fn sparse_command(&self, name: &str) -> String {
        match self.dims() {
            Some((rows, cols)) => format!(
                "{0} = sparse({0}(:,1), {0}(:,2), {0}(:,3), {1}, {2});",
                name, rows, cols
            ),
            None => format!("{0} = sparse({0}(:,1), {0}(:,2), {0}(:,3));", name),
        }
    }
}

#[test]
#[allow(deprecated)]
fn test_sparse_shape() {
    assert_eq!(
        SparseShape::new(2, 3),
        SparseShape::Explicit { rows: 2, cols: 3 }
    );
    assert_eq!(SparseShape::new(0, 3), SparseShape::Inferred);
    assert_eq!(SparseShape::new(4, 0), SparseShape::Inferred);
    assert_eq!(SparseShape::square(2).dims(), Some((2, 2)));

    assert_eq!(
        SparseShape::square(5).sparse_command("A"),
        "A = sparse(A(:,1), A(:,2), A(:,3), 5, 5);"
    );
    assert_eq!(
        SparseShape::Inferred.sparse_command("A"),
        "A = sparse(A(:,1), A(:,2), A(:,3));"
    );
}
