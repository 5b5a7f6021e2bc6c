pub mod math;

use std::fmt::Debug;

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVecは0要素を疎とした疎ベクトルの実装です
/// indices と values を持ち
/// indices は要素のインデックスを保持し、
/// values は要素の値を保持します
///
/// 要素は indices の昇順でソートされていることを保証します
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    inds: Vec<usize>,
    vals: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len: 0,
        }
    }

    /// `cap` is the expected number of non-zero elements
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            len: 0,
        }
    }

    /// Build from (index, value) pairs of a `len`-dimensional vector.
    /// Pairs must be sorted by index without duplicates; zero values are dropped.
    ///
    /// # Arguments
    /// * `len` - 次元数
    /// * `pairs` - (index, value), index 昇順
    pub fn from_sorted_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let mut vec = ZeroSpVec::new();
        for (index, value) in pairs {
            debug_assert!(index < len, "index {index} out of range for len {len}");
            debug_assert!(
                vec.inds.last().map_or(true, |&last| last < index),
                "pairs must be strictly ascending by index"
            );
            if value != N::zero() {
                vec.inds.push(index);
                vec.vals.push(value);
            }
        }
        vec.len = len;
        vec
    }

    /// 末尾に要素を追加 (0 は格納せず次元だけ伸ばす)
    #[inline]
    pub fn push(&mut self, elem: N) {
        if elem != N::zero() {
            self.inds.push(self.len);
            self.vals.push(elem);
        }
        self.len += 1;
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&index) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// non-zero elements only, ascending by index
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    /// 0 埋めした密ベクトル
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (i, v) in self.raw_iter() {
            dense[i] = v;
        }
        dense
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> From<Vec<N>> for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn from(dense: Vec<N>) -> Self {
        let mut vec = ZeroSpVec::with_capacity(dense.len());
        for v in dense {
            vec.push(v);
        }
        vec.shrink_to_fit();
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_skips_zero_storage() {
        let mut v: ZeroSpVec<f64> = ZeroSpVec::new();
        v.push(0.0);
        v.push(2.0);
        v.push(0.0);
        v.push(3.5);
        assert_eq!(v.len(), 4);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(0), Some(0.0));
        assert_eq!(v.get(3), Some(3.5));
        assert_eq!(v.get(4), None);
        assert_eq!(v.raw_iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 3.5)]);
    }

    #[test]
    fn from_sorted_pairs_drops_zeros() {
        let v = ZeroSpVec::from_sorted_pairs(5, vec![(0, 1.0f32), (2, 0.0), (4, 2.0)]);
        assert_eq!(v.len(), 5);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.to_dense(), vec![1.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn dense_round_trip() {
        let dense = vec![0u32, 4, 0, 0, 7];
        let v = ZeroSpVec::from(dense.clone());
        assert_eq!(v.to_dense(), dense);
    }
}
