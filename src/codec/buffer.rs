use super::{dense, CodecError};
use crate::algebra::{Complex64, Layout};
use crate::engine::EngineArray;
use enum_dispatch::*;

/// Element kind of a host matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// double precision values
    Real,
    /// 0-based indices, shifted by one across the engine boundary
    Index,
    /// complex double precision values
    Complex,
}

/// Operations shared by every host matrix buffer.
#[enum_dispatch]
pub trait HostMatrix {
    fn kind(&self) -> ElementKind;
    fn size(&self) -> (usize, usize);
    fn layout(&self) -> Layout;

    /// Engine image of the buffer contents.
    fn encode(&self) -> EngineArray;

    /// Overwrite the buffer contents from an engine matrix of the same
    /// shape.  On failure the buffer is left unchanged.
    fn decode_from(&mut self, handle: &EngineArray) -> Result<(), CodecError>;
}

macro_rules! host_buffer {
    ($name:ident, $elem:ty, $kind:ident, $encode:path, $decode:path, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            m: usize,
            n: usize,
            layout: Layout,
            data: Vec<$elem>,
        }

        impl $name {
            /// # Panics
            /// Panics if `data` does not hold `m*n` entries.
            pub fn new(m: usize, n: usize, data: Vec<$elem>, layout: Layout) -> Self {
                assert_eq!(data.len(), m * n);
                Self { m, n, layout, data }
            }

            /// Buffer of zeros, to be filled by a decode.
            pub fn zeros(m: usize, n: usize, layout: Layout) -> Self {
                Self::new(m, n, vec![<$elem>::default(); m * n], layout)
            }

            pub fn data(&self) -> &[$elem] {
                &self.data
            }

            pub fn into_vec(self) -> Vec<$elem> {
                self.data
            }

            /// Element at `(i, j)`.
            pub fn get(&self, i: usize, j: usize) -> $elem {
                self.data[self.layout.host_index(i, j, self.m, self.n)]
            }
        }

        impl HostMatrix for $name {
            fn kind(&self) -> ElementKind {
                ElementKind::$kind
            }
            fn size(&self) -> (usize, usize) {
                (self.m, self.n)
            }
            fn layout(&self) -> Layout {
                self.layout
            }
            fn encode(&self) -> EngineArray {
                $encode(self.m, self.n, Some(&self.data[..]), self.layout)
            }
            fn decode_from(&mut self, handle: &EngineArray) -> Result<(), CodecError> {
                $decode(handle, self.m, self.n, &mut self.data, self.layout)
            }
        }
    };
}

host_buffer!(
    RealBuffer,
    f64,
    Real,
    dense::encode_real,
    dense::decode_real,
    "Host matrix of real values."
);
host_buffer!(
    IndexBuffer,
    usize,
    Index,
    dense::encode_index,
    dense::decode_index,
    "Host matrix of 0-based indices."
);
host_buffer!(
    ComplexBuffer,
    Complex64,
    Complex,
    dense::encode_complex,
    dense::decode_complex,
    "Host matrix of complex values."
);

/// A host matrix buffer tagged with its element kind.
///
/// The kind decides how cells cross the boundary: real values are cast to
/// double precision, indices are shifted by one, and complex values fill
/// complex engine cells.
#[enum_dispatch(HostMatrix)]
#[derive(Debug, Clone, PartialEq)]
pub enum HostBuffer {
    Real(RealBuffer),
    Index(IndexBuffer),
    Complex(ComplexBuffer),
}

impl HostBuffer {
    /// Empty buffer of the given kind and shape, ready to be decoded into.
    pub fn zeros(kind: ElementKind, m: usize, n: usize, layout: Layout) -> Self {
        match kind {
            ElementKind::Real => RealBuffer::zeros(m, n, layout).into(),
            ElementKind::Index => IndexBuffer::zeros(m, n, layout).into(),
            ElementKind::Complex => ComplexBuffer::zeros(m, n, layout).into(),
        }
    }
}
