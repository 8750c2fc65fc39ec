//! 単精度浮動小数点数のベクトル
//!
//! 単語ベクトルの累積や類似度計算に使用する、固定長のベクトル型を提供します。
//! すべての演算は`f32`のまま行われ、暗黙の精度拡張は行いません。

use std::fmt;
use std::ops::Index;

use crate::errors::{FastTextError, Result};
use crate::matrix::Matrix;

/// 固定長の`f32`ベクトル。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    /// 長さ`len`のゼロベクトルを作成します。
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// 既存の値からベクトルを作成します。
    pub const fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// ベクトルの長さを取得します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// ベクトルが空かどうかを返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// すべての要素を0にします。
    pub fn zero(&mut self) {
        self.data.fill(0.0);
    }

    /// 要素のスライスを取得します。
    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// 要素の可変スライスを取得します。
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// 内部の`Vec`を取り出します。
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// `i`番目の要素を取得します。範囲外の場合は`None`です。
    #[inline(always)]
    pub fn at(&self, i: usize) -> Option<f32> {
        self.data.get(i).copied()
    }

    /// `i`番目の要素を設定します。
    ///
    /// # エラー
    ///
    /// `i`が範囲外の場合、[`FastTextError::InvalidArgument`]を返します。
    pub fn set(&mut self, i: usize, v: f32) -> Result<()> {
        *self.element_mut(i)? = v;
        Ok(())
    }

    /// `i`番目の要素に`v`を加算します。
    ///
    /// # エラー
    ///
    /// `i`が範囲外の場合、[`FastTextError::InvalidArgument`]を返します。
    pub fn add_at(&mut self, i: usize, v: f32) -> Result<()> {
        *self.element_mut(i)? += v;
        Ok(())
    }

    /// 他のベクトルを加算します。
    ///
    /// # エラー
    ///
    /// 長さが異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn add_vector(&mut self, source: &Self) -> Result<()> {
        self.check_len(source.len())?;
        self.accumulate(source.as_slice());
        Ok(())
    }

    /// `s`倍した他のベクトルを加算します。
    ///
    /// # エラー
    ///
    /// 長さが異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn add_vector_scaled(&mut self, source: &Self, s: f32) -> Result<()> {
        self.check_len(source.len())?;
        for (x, &y) in self.data.iter_mut().zip(source.as_slice()) {
            *x += s * y;
        }
        Ok(())
    }

    /// 行列の`i`行目を加算します。
    ///
    /// # エラー
    ///
    /// - 行が範囲外の場合は[`FastTextError::InvalidArgument`]
    /// - 行列の列数とベクトルの長さが異なる場合は[`FastTextError::DimensionMismatch`]
    pub fn add_row(&mut self, matrix: &Matrix, i: usize) -> Result<()> {
        self.check_len(matrix.cols())?;
        self.accumulate(matrix.checked_row(i)?);
        Ok(())
    }

    /// `a`倍した行列の`i`行目を加算します。
    ///
    /// # エラー
    ///
    /// [`Vector::add_row`]と同じです。
    pub fn add_row_scaled(&mut self, matrix: &Matrix, i: usize, a: f32) -> Result<()> {
        self.check_len(matrix.cols())?;
        for (x, &y) in self.data.iter_mut().zip(matrix.checked_row(i)?) {
            *x += a * y;
        }
        Ok(())
    }

    /// すべての要素に`a`を掛けます。
    pub fn mul(&mut self, a: f32) {
        for x in &mut self.data {
            *x *= a;
        }
    }

    /// 内積を計算します。
    ///
    /// # エラー
    ///
    /// 長さが異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn dot(&self, other: &Self) -> Result<f32> {
        self.check_len(other.len())?;
        Ok(self.data.iter().zip(other.as_slice()).map(|(&x, &y)| x * y).sum())
    }

    /// ユークリッドノルムを計算します。
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|&x| x * x).sum::<f32>().sqrt()
    }

    /// 最大要素の位置を返します。同値の場合は最初の位置を返し、空の場合は`None`です。
    pub fn argmax(&self) -> Option<usize> {
        let (first, rest) = self.data.split_first()?;
        let mut max = *first;
        let mut argmax = 0;
        for (i, &x) in rest.iter().enumerate() {
            if x > max {
                max = x;
                argmax = i + 1;
            }
        }
        Some(argmax)
    }

    /// 行列とベクトルの積を計算し、このベクトルに格納します。
    ///
    /// `self[i] = matrix.dot_row(vector, i)`
    ///
    /// # エラー
    ///
    /// - 行列の行数とこのベクトルの長さ、または列数と`vector`の長さが異なる場合は
    ///   [`FastTextError::DimensionMismatch`]
    /// - 内積がNaNになった場合は[`FastTextError::NumericInstability`]
    pub fn mul_matrix(&mut self, matrix: &Matrix, vector: &Self) -> Result<()> {
        self.check_len(matrix.rows())?;
        for (i, x) in self.data.iter_mut().enumerate() {
            *x = matrix.dot_row(vector, i)?;
        }
        Ok(())
    }

    /// コサイン類似度を計算します。どちらかのノルムが0の場合は0を返します。
    ///
    /// # エラー
    ///
    /// 長さが異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn cosine(&self, other: &Self) -> Result<f32> {
        let dot = self.dot(other)?;
        let norms = self.norm() * other.norm();
        if norms == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / norms)
    }

    /// 長さを検証せずにスライスを加算します。
    #[inline(always)]
    pub(crate) fn accumulate(&mut self, row: &[f32]) {
        debug_assert_eq!(self.data.len(), row.len());
        for (x, &y) in self.data.iter_mut().zip(row) {
            *x += y;
        }
    }

    #[inline(always)]
    fn check_len(&self, len: usize) -> Result<()> {
        if self.data.len() != len {
            return Err(FastTextError::dimension_mismatch(self.data.len(), len));
        }
        Ok(())
    }

    fn element_mut(&mut self, i: usize) -> Result<&mut f32> {
        let len = self.data.len();
        self.data.get_mut(i).ok_or_else(|| {
            FastTextError::invalid_argument("i", format!("index {i} is out of range for length {len}"))
        })
    }
}

impl Index<usize> for Vector {
    type Output = f32;

    #[inline(always)]
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl From<Vector> for Vec<f32> {
    fn from(v: Vector) -> Self {
        v.data
    }
}

/// 要素を空白区切りで出力します。
impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, x) in self.data.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{x}")?;
        }
        Ok(())
    }
}
