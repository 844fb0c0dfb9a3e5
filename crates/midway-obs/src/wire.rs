//! Binary serialization for tensor bundles.
//!
//! Wire format:
//! ```text
//! [4 bytes] magic "MPTB"
//! [2 bytes] version (little-endian u16)
//! [2 bytes] n_tensors (little-endian u16)
//! [n_tensors × tensor]
//! ```
//!
//! Each tensor:
//! ```text
//! [2 bytes] name_len (LE u16)
//! [name_len bytes] name (UTF-8)
//! [1 byte]  rank
//! [rank × 4 bytes] dims (LE u32 each)
//! [product(dims) × 8 bytes] data (LE f64 each)
//! ```

use midway_core::ContractViolation;
use smallvec::SmallVec;

use crate::tensor::{Tensor, TensorBundle};

const MAGIC: &[u8; 4] = b"MPTB";
const VERSION: u16 = 1;

fn malformed(reason: impl Into<String>) -> ContractViolation {
    ContractViolation::MalformedBundle {
        reason: reason.into(),
    }
}

/// Serialize a [`TensorBundle`] to bytes.
///
/// Returns `Err` if a count or length exceeds its wire-format range
/// (e.g. more than `u16::MAX` tensors).
pub fn serialize(bundle: &TensorBundle) -> Result<Vec<u8>, ContractViolation> {
    let payload: usize = bundle.iter().map(|(n, t)| n.len() + t.len() * 8 + 16).sum();
    let mut buf = Vec::with_capacity(8 + payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    let n = u16::try_from(bundle.len()).map_err(|_| {
        malformed(format!(
            "too many tensors: {} exceeds u16::MAX ({})",
            bundle.len(),
            u16::MAX
        ))
    })?;
    buf.extend_from_slice(&n.to_le_bytes());

    for (name, tensor) in bundle.iter() {
        write_tensor(&mut buf, name, tensor)?;
    }
    Ok(buf)
}

fn write_tensor(buf: &mut Vec<u8>, name: &str, tensor: &Tensor) -> Result<(), ContractViolation> {
    let name_len = u16::try_from(name.len())
        .map_err(|_| malformed(format!("tensor name of {} bytes exceeds u16::MAX", name.len())))?;
    buf.extend_from_slice(&name_len.to_le_bytes());
    buf.extend_from_slice(name.as_bytes());

    let rank = u8::try_from(tensor.shape().len())
        .map_err(|_| malformed(format!("{name}: rank {} exceeds u8::MAX", tensor.shape().len())))?;
    buf.push(rank);
    for &dim in tensor.shape() {
        let d = u32::try_from(dim)
            .map_err(|_| malformed(format!("{name}: dimension {dim} exceeds u32::MAX")))?;
        buf.extend_from_slice(&d.to_le_bytes());
    }

    for &v in tensor.data() {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    Ok(())
}

/// Deserialize a [`TensorBundle`] from bytes.
pub fn deserialize(bytes: &[u8]) -> Result<TensorBundle, ContractViolation> {
    let mut r = Reader::new(bytes);

    let magic = r.read_bytes(4)?;
    if magic != MAGIC {
        return Err(malformed(format!(
            "invalid magic: expected 'MPTB', got '{}'",
            String::from_utf8_lossy(magic)
        )));
    }

    let version = r.read_u16()?;
    if version > VERSION {
        return Err(malformed(format!(
            "unsupported version {version}, max supported is {VERSION}"
        )));
    }

    let n = r.read_u16()? as usize;
    let mut bundle = TensorBundle::new();
    for i in 0..n {
        let (name, tensor) = read_tensor(&mut r).map_err(|e| match e {
            ContractViolation::MalformedBundle { reason } => {
                malformed(format!("tensor {i}: {reason}"))
            }
            other => other,
        })?;
        if bundle.get(&name).is_some() {
            return Err(malformed(format!("duplicate tensor '{name}'")));
        }
        bundle.insert(name, tensor);
    }

    if r.pos != bytes.len() {
        return Err(malformed(format!(
            "trailing bytes: {} unconsumed after {n} tensors",
            bytes.len() - r.pos
        )));
    }
    Ok(bundle)
}

fn read_tensor(r: &mut Reader<'_>) -> Result<(String, Tensor), ContractViolation> {
    let name_len = r.read_u16()? as usize;
    let name = std::str::from_utf8(r.read_bytes(name_len)?)
        .map_err(|_| malformed("name is not valid UTF-8"))?
        .to_string();

    let rank = r.read_u8()? as usize;
    let mut shape: SmallVec<[usize; 4]> = SmallVec::with_capacity(rank);
    for _ in 0..rank {
        shape.push(r.read_u32()? as usize);
    }

    let count = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&c| c.checked_mul(8).is_some_and(|b| b <= r.remaining()))
        .ok_or_else(|| malformed(format!("'{name}': shape {shape:?} exceeds the remaining data")))?;
    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        data.push(r.read_f64()?);
    }

    let tensor = Tensor::from_parts(&shape, data)?;
    Ok((name, tensor))
}

/// Cursor over the input bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ContractViolation> {
        if n > self.remaining() {
            return Err(malformed("unexpected end of data"));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ContractViolation> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, ContractViolation> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ContractViolation> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f64(&mut self) -> Result<f64, ContractViolation> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TensorBundle {
        let mut b = TensorBundle::new();
        let mut grid = Tensor::zeros(&[2, 2, 3]);
        grid.set(&[1, 0, 2], 0.5);
        b.insert("grid", grid);
        b.insert(
            "park_vector",
            Tensor::from_parts(&[3], vec![1.0, -0.25, 0.125]).unwrap(),
        );
        b.insert("empty", Tensor::zeros(&[0, 8]));
        b
    }

    #[test]
    fn round_trip() {
        let b = sample();
        let bytes = serialize(&b).unwrap();
        assert_eq!(&bytes[..4], b"MPTB");
        let back = deserialize(&bytes).unwrap();
        assert_eq!(back, b);
        let names: Vec<_> = back.names().collect();
        assert_eq!(names, ["grid", "park_vector", "empty"]);
    }

    #[test]
    fn empty_bundle() {
        let bytes = serialize(&TensorBundle::new()).unwrap();
        assert_eq!(bytes.len(), 8);
        assert!(deserialize(&bytes).unwrap().is_empty());
    }

    #[test]
    fn bad_magic() {
        let mut bytes = serialize(&sample()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            deserialize(&bytes),
            Err(ContractViolation::MalformedBundle { reason }) if reason.contains("magic")
        ));
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut bytes = serialize(&sample()).unwrap();
        bytes[4..6].copy_from_slice(&2u16.to_le_bytes());
        assert!(deserialize(&bytes).is_err());
    }

    #[test]
    fn truncated_input() {
        let bytes = serialize(&sample()).unwrap();
        for cut in [3, 7, 12, bytes.len() - 1] {
            assert!(deserialize(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = serialize(&sample()).unwrap();
        bytes.push(0);
        assert!(matches!(
            deserialize(&bytes),
            Err(ContractViolation::MalformedBundle { reason }) if reason.contains("trailing")
        ));
    }

    #[test]
    fn oversized_shape_is_rejected_before_allocating() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MPTB");
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.push(b'g');
        bytes.push(2);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(deserialize(&bytes).is_err());
    }
}
