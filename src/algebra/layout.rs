//! Index arithmetic between host buffers and engine storage.
//!
//! The engine always stores dense matrices in column-major order.  Host
//! buffers may be either row-major or column-major, and every transfer must
//! state which one it is using a [`Layout`].  `Layout` has no default.
//! A buffer passed with the wrong layout is silently transposed.

/// Memory ordering of a host matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Fortran-style: linear index `i + j*m`.
    ColumnMajor,
    /// C-style: linear index `i*n + j`.
    RowMajor,
}

impl Layout {
    /// Layout from the `column_major` flag used at C-style boundaries.
    pub fn from_column_major(column_major: bool) -> Self {
        if column_major {
            Layout::ColumnMajor
        } else {
            Layout::RowMajor
        }
    }

    pub fn is_column_major(self) -> bool {
        self == Layout::ColumnMajor
    }

    /// Offset of element `(i, j)` of an `m x n` matrix in a host buffer
    /// with this layout.
    #[inline(always)]
    pub fn host_index(self, i: usize, j: usize, m: usize, n: usize) -> usize {
        match self {
            Layout::ColumnMajor => engine_index(i, j, m),
            Layout::RowMajor => i * n + j,
        }
    }
}

/// Offset of element `(i, j)` of an `m x n` matrix in engine storage.
#[inline(always)]
pub fn engine_index(i: usize, j: usize, m: usize) -> usize {
    j * m + i
}

/// Iterator over every cell of an `m x n` matrix, yielding the pair
/// `(engine_offset, host_offset)`.
///
/// Cells are visited column by column, so engine offsets come out in
/// increasing order.  Every encode and decode path in the crate walks its
/// matrix through this iterator, which is what makes encode followed by
/// decode lossless for any shape.
#[derive(Debug, Clone)]
pub struct LayoutMap {
    m: usize,
    n: usize,
    layout: Layout,
    i: usize,
    j: usize,
}

impl LayoutMap {
    pub fn new(m: usize, n: usize, layout: Layout) -> Self {
        LayoutMap {
            m,
            n,
            layout,
            i: 0,
            j: 0,
        }
    }

    /// number of cells in the mapped matrix
    pub fn numel(&self) -> usize {
        self.m * self.n
    }
}

impl Iterator for LayoutMap {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.m == 0 || self.j >= self.n {
            return None;
        }
        let (i, j) = (self.i, self.j);
        self.i += 1;
        if self.i == self.m {
            self.i = 0;
            self.j += 1;
        }
        Some((
            engine_index(i, j, self.m),
            self.layout.host_index(i, j, self.m, self.n),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.m == 0 || self.j >= self.n {
            0
        } else {
            (self.n - self.j) * self.m - self.i
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LayoutMap {}
