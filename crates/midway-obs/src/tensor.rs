//! Dense tensors and the named bundle that carries one observation.

use indexmap::IndexMap;
use midway_core::ContractViolation;
use smallvec::SmallVec;

/// Tensor dimensions, row-major.
pub type Shape = SmallVec<[usize; 4]>;

/// A dense row-major `f64` tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f64>,
}

impl Tensor {
    /// A zero-filled tensor.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
            data: vec![0.0; shape.iter().product()],
        }
    }

    /// Wrap `data`, which must hold exactly `shape.iter().product()` values.
    pub fn from_parts(shape: &[usize], data: Vec<f64>) -> Result<Self, ContractViolation> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ContractViolation::MalformedBundle {
                reason: format!(
                    "shape {shape:?} needs {expected} values, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self {
            shape: shape.iter().copied().collect(),
            data,
        })
    }

    /// Dimensions.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Flat values, mutably.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.shape.len(), "rank mismatch");
        index
            .iter()
            .zip(self.shape.iter())
            .fold(0, |acc, (&i, &dim)| {
                debug_assert!(i < dim, "index {i} out of range for dim {dim}");
                acc * dim + i
            })
    }

    /// Element at a multi-index.
    ///
    /// # Panics
    ///
    /// If the index lies outside the tensor.
    pub fn get(&self, index: &[usize]) -> f64 {
        self.data[self.offset(index)]
    }

    /// Overwrite the element at a multi-index.
    ///
    /// # Panics
    ///
    /// If the index lies outside the tensor.
    pub fn set(&mut self, index: &[usize], value: f64) {
        let at = self.offset(index);
        self.data[at] = value;
    }

    /// One row of a rank-2 tensor, or a contiguous slab of a rank-3 one.
    pub fn row(&self, index: &[usize]) -> &[f64] {
        let width: usize = self.shape[index.len()..].iter().product();
        let start = index
            .iter()
            .zip(self.shape.iter())
            .fold(0, |acc, (&i, &dim)| acc * dim + i)
            * width;
        &self.data[start..start + width]
    }
}

/// The named tensors encoding one snapshot, in layout order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TensorBundle {
    tensors: IndexMap<String, Tensor>,
}

impl TensorBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a tensor.
    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) {
        self.tensors.insert(name.into(), tensor);
    }

    /// Look up a tensor.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    /// Look up a tensor that must exist with the given shape.
    pub fn require(&self, name: &str, shape: &[usize]) -> Result<&Tensor, ContractViolation> {
        let t = self
            .tensors
            .get(name)
            .ok_or_else(|| ContractViolation::MissingTensor {
                name: name.to_string(),
            })?;
        if t.shape() != shape {
            return Err(ContractViolation::TensorShape {
                name: name.to_string(),
                expected: shape.to_vec(),
                found: t.shape().to_vec(),
            });
        }
        Ok(t)
    }

    /// Tensor names in layout order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tensors.keys().map(String::as_str)
    }

    /// `(name, tensor)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> + '_ {
        self.tensors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the bundle holds no tensors.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }
}
