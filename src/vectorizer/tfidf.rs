use num::{Float, NumCast};

use crate::utils::math::vector::ZeroSpVec;

/// Term weighting strategy.
///
/// By implementing this trait, a different weighting scheme can be plugged
/// into [`crate::VectorSpaceBuilder`]. `DefaultTFIDFEngine` provides the
/// smoothed textbook formulation.
pub trait TFIDFEngine<N>
where
    N: Float,
{
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `doc_freqs` - 各 term を含む文書数 (vocabulary の列順)
    /// * `doc_num` - 文書数
    /// # Returns
    /// * `Vec<f64>` - IDFベクトル
    fn idf_vec(doc_freqs: &[u64], doc_num: u64) -> Vec<f64>;

    /// TF × IDF の行ベクトル
    /// # Arguments
    /// * `counts` - (column, count), column 昇順
    /// * `idf` - IDFベクトル
    /// * `dim` - vocabulary size
    /// * `normalize` - L2 正規化するか
    fn tf_idf_vec(counts: &[(usize, u32)], idf: &[f64], dim: usize, normalize: bool) -> ZeroSpVec<N>;

    /// 生の出現回数の行ベクトル
    fn count_vec(counts: &[(usize, u32)], dim: usize) -> ZeroSpVec<N>;
}

/// デフォルトのTF-IDFエンジン
/// `idf = ln((1 + n) / (1 + df)) + 1`
///
/// The `+ 1` keeps a term that appears in every document at a small
/// positive weight instead of zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

#[inline]
fn cast<N: Float>(value: f64) -> N {
    <N as NumCast>::from(value).unwrap_or_else(N::zero)
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float,
{
    fn idf_vec(doc_freqs: &[u64], doc_num: u64) -> Vec<f64> {
        doc_freqs
            .iter()
            .map(|&df| Self::idf_calc(doc_num, df))
            .collect()
    }

    fn tf_idf_vec(counts: &[(usize, u32)], idf: &[f64], dim: usize, normalize: bool) -> ZeroSpVec<N> {
        let weights: Vec<(usize, f64)> = counts
            .iter()
            .map(|&(col, count)| (col, count as f64 * idf.get(col).copied().unwrap_or(0.0)))
            .collect();
        let scale = if normalize {
            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 { 1.0 / norm } else { 1.0 }
        } else {
            1.0
        };
        ZeroSpVec::from_sorted_pairs(dim, weights.into_iter().map(|(col, w)| (col, cast(w * scale))))
    }

    fn count_vec(counts: &[(usize, u32)], dim: usize) -> ZeroSpVec<N> {
        ZeroSpVec::from_sorted_pairs(dim, counts.iter().map(|&(col, count)| (col, cast(count as f64))))
    }
}
