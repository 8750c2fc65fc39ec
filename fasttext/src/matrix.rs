//! 行優先の密行列
//!
//! 単語埋め込み行列とサブワード埋め込み行列の両方に使用される、
//! 固定形状の`f32`行列を提供します。

use std::io::Read;

use crate::errors::{FastTextError, Result};
use crate::reader::BinaryReader;
use crate::vector::Vector;

/// `rows × cols`の行優先密行列。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// ゼロ行列を作成します。
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// 行優先の値から行列を作成します。
    ///
    /// # エラー
    ///
    /// `data`の長さが`rows * cols`と異なる場合、[`FastTextError::InvalidArgument`]を返します。
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            FastTextError::invalid_argument("rows", "rows * cols overflows usize")
        })?;
        if data.len() != len {
            return Err(FastTextError::invalid_argument(
                "data",
                format!("expected {len} values for a {rows}x{cols} matrix, got {}", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// 形状を検証せずに行列を作成します。
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    /// ストリームから`rows * cols`個の値を読み込んで行列を作成します。
    ///
    /// # エラー
    ///
    /// ストリームが途中で終了した場合、[`FastTextError::TruncatedInput`]を返します。
    pub(crate) fn read<R>(
        rdr: &mut BinaryReader<R>,
        rows: usize,
        cols: usize,
        field: &'static str,
    ) -> Result<Self>
    where
        R: Read,
    {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| FastTextError::invalid_format(field, "matrix size overflows usize"))?;
        let data = rdr.read_f32_vec(len, field)?;
        Ok(Self { rows, cols, data })
    }

    /// 行数を取得します。
    #[inline(always)]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// 列数を取得します。
    #[inline(always)]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(i, j)`の要素を取得します。範囲外の場合は`None`です。
    #[inline(always)]
    pub fn at(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// `i`行目を取得します。
    ///
    /// # Panics
    ///
    /// `i`が範囲外の場合にパニックします。
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// `i`行目を新しいベクトルにコピーします。
    ///
    /// # エラー
    ///
    /// `i`が範囲外の場合、[`FastTextError::InvalidArgument`]を返します。
    pub fn row_to_vector(&self, i: usize) -> Result<Vector> {
        Ok(Vector::from_vec(self.checked_row(i)?.to_vec()))
    }

    /// 行優先の値のスライスを取得します。
    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// すべての要素を0にします。
    pub fn zero(&mut self) {
        self.data.fill(0.0);
    }

    /// `i`行目と`vec`の内積を計算します。
    ///
    /// # エラー
    ///
    /// - `i`が範囲外の場合は[`FastTextError::InvalidArgument`]
    /// - `vec`の長さが列数と異なる場合は[`FastTextError::DimensionMismatch`]
    /// - 結果がNaNの場合は[`FastTextError::NumericInstability`]
    pub fn dot_row(&self, vec: &Vector, i: usize) -> Result<f32> {
        self.check_cols(vec)?;
        let d: f32 = self
            .checked_row(i)?
            .iter()
            .zip(vec.as_slice())
            .map(|(&x, &y)| x * y)
            .sum();
        if d.is_nan() {
            return Err(FastTextError::NumericInstability);
        }
        Ok(d)
    }

    /// `a`倍した`vec`を`i`行目に加算します。
    ///
    /// # エラー
    ///
    /// - `i`が範囲外の場合は[`FastTextError::InvalidArgument`]
    /// - `vec`の長さが列数と異なる場合は[`FastTextError::DimensionMismatch`]
    pub fn add_to_row(&mut self, vec: &Vector, i: usize, a: f32) -> Result<()> {
        self.check_cols(vec)?;
        self.check_row(i)?;
        let cols = self.cols;
        for (x, &y) in self.data[i * cols..(i + 1) * cols].iter_mut().zip(vec.as_slice()) {
            *x += a * y;
        }
        Ok(())
    }

    /// 各行に`nums`の対応する要素を掛けます。
    ///
    /// # エラー
    ///
    /// `nums`の長さが行数と異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn multiply_rows(&mut self, nums: &Vector) -> Result<()> {
        self.check_rows(nums)?;
        if self.cols == 0 {
            return Ok(());
        }
        for (row, &num) in self.data.chunks_exact_mut(self.cols).zip(nums.as_slice()) {
            for x in row {
                *x *= num;
            }
        }
        Ok(())
    }

    /// 各行を`denoms`の対応する要素で割ります。
    ///
    /// 除数が0の行は変更しません。
    ///
    /// # エラー
    ///
    /// `denoms`の長さが行数と異なる場合、[`FastTextError::DimensionMismatch`]を返します。
    pub fn divide_rows(&mut self, denoms: &Vector) -> Result<()> {
        self.check_rows(denoms)?;
        if self.cols == 0 {
            return Ok(());
        }
        for (row, &denom) in self.data.chunks_exact_mut(self.cols).zip(denoms.as_slice()) {
            if denom == 0.0 {
                continue;
            }
            for x in row {
                *x /= denom;
            }
        }
        Ok(())
    }

    /// 各行をL2ノルムで正規化します。ノルムが0の行は変更しません。
    pub fn l2_normalize_rows(&mut self) {
        if self.cols == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(self.cols) {
            let norm = row.iter().map(|&x| x * x).sum::<f32>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for x in row {
                *x /= norm;
            }
        }
    }

    /// 範囲を検証して`i`行目を取得します。
    pub(crate) fn checked_row(&self, i: usize) -> Result<&[f32]> {
        self.check_row(i)?;
        Ok(self.row(i))
    }

    fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.rows {
            return Err(FastTextError::invalid_argument(
                "i",
                format!("row {i} is out of range for {} rows", self.rows),
            ));
        }
        Ok(())
    }

    fn check_cols(&self, vec: &Vector) -> Result<()> {
        if vec.len() != self.cols {
            return Err(FastTextError::dimension_mismatch(self.cols, vec.len()));
        }
        Ok(())
    }

    fn check_rows(&self, vec: &Vector) -> Result<()> {
        if vec.len() != self.rows {
            return Err(FastTextError::dimension_mismatch(self.rows, vec.len()));
        }
        Ok(())
    }
}
