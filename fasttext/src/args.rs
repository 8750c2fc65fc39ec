//! モデルのハイパーパラメータ
//!
//! このモジュールは、モデルファイルのヘッダ直後に格納されている
//! ハイパーパラメータブロックのデコードと、旧バージョンとの互換性規則を提供します。
//! 推論に使用しないフィールドも、後続のフィールドと同期を保つためにすべて読み飛ばします。

use std::fmt;
use std::io::Read;

use crate::errors::{FastTextError, Result};
use crate::reader::BinaryReader;

/// サブワード特徴を持たない旧形式の教師ありモデルのフォーマットバージョン。
pub const LEGACY_SUPERVISED_VERSION: i32 = 11;

/// モデルの種類。
///
/// 推論アルゴリズムは種類によって変わりません。互換性規則の判定にのみ使用されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Continuous bag-of-words
    Cbow,
    /// Skip-gram
    SkipGram,
    /// 教師あり分類モデル
    Supervised,
}

impl ModelKind {
    const VARIANTS: [Self; 3] = [Self::Cbow, Self::SkipGram, Self::Supervised];

    /// ファイルに格納された値(1始まり)から種類を取得します。
    ///
    /// # エラー
    ///
    /// 値が1から3の範囲外の場合、[`FastTextError::UnknownModelKind`]を返します。
    pub fn from_value(value: i32) -> Result<Self> {
        value
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| Self::VARIANTS.get(i).copied())
            .ok_or(FastTextError::UnknownModelKind(value))
    }

    /// ファイルに格納される値を取得します。
    pub const fn value(self) -> i32 {
        match self {
            Self::Cbow => 1,
            Self::SkipGram => 2,
            Self::Supervised => 3,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Cbow => "cbow",
            Self::SkipGram => "skipgram",
            Self::Supervised => "supervised",
        };
        f.write_str(name)
    }
}

/// モデルのハイパーパラメータ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args {
    dim: usize,
    model: ModelKind,
    bucket: usize,
    min_n: usize,
    max_n: usize,
}

impl Args {
    /// 新しいインスタンスを作成します。
    ///
    /// # 引数
    ///
    /// * `dim` - 埋め込みベクトルの次元
    /// * `model` - モデルの種類
    /// * `bucket` - サブワードのハッシュ空間の大きさ
    /// * `min_n` - 文字n-gramの最小長
    /// * `max_n` - 文字n-gramの最大長。0の場合はn-gramを使用しません。
    pub const fn new(
        dim: usize,
        model: ModelKind,
        bucket: usize,
        min_n: usize,
        max_n: usize,
    ) -> Self {
        Self {
            dim,
            model,
            bucket,
            min_n,
            max_n,
        }
    }

    /// ハイパーパラメータブロックを読み込みます。
    ///
    /// 互換性規則はここでは適用されません。[`Args::apply_version_compat`]を参照してください。
    ///
    /// # エラー
    ///
    /// - ストリームが途中で終了した場合は[`FastTextError::TruncatedInput`]
    /// - モデルの種類が不明な場合は[`FastTextError::UnknownModelKind`]
    /// - 次元などが負の値の場合は[`FastTextError::InvalidFormat`]
    pub(crate) fn read<R>(rdr: &mut BinaryReader<R>) -> Result<Self>
    where
        R: Read,
    {
        let dim = rdr.read_i32("args.dim")?;
        rdr.read_i32("args.ws")?;
        rdr.read_i32("args.epoch")?;
        rdr.read_i32("args.min_count")?;
        rdr.read_i32("args.neg")?;
        rdr.read_i32("args.loss")?;
        rdr.read_i32("args.word_ngrams")?;
        let model = ModelKind::from_value(rdr.read_i32("args.model")?)?;
        let bucket = rdr.read_i32("args.bucket")?;
        let min_n = rdr.read_i32("args.minn")?;
        let max_n = rdr.read_i32("args.maxn")?;
        rdr.read_i32("args.lr_update_rate")?;
        rdr.read_f64("args.t")?;

        Ok(Self {
            dim: non_negative("args.dim", dim)?,
            model,
            bucket: non_negative("args.bucket", bucket)?,
            min_n: non_negative("args.minn", min_n)?,
            max_n: non_negative("args.maxn", max_n)?,
        })
    }

    /// フォーマットバージョンに応じた互換性規則を適用します。
    ///
    /// バージョン11の教師ありモデルは文字n-gramを使用しないため、`max_n`を0にします。
    ///
    /// # 戻り値
    ///
    /// 規則が適用された場合は`true`
    pub fn apply_version_compat(&mut self, version: i32) -> bool {
        if version == LEGACY_SUPERVISED_VERSION && self.model == ModelKind::Supervised {
            self.max_n = 0;
            return true;
        }
        false
    }

    /// 埋め込みベクトルの次元を取得します。
    #[inline(always)]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// モデルの種類を取得します。
    #[inline(always)]
    pub const fn model(&self) -> ModelKind {
        self.model
    }

    /// サブワードのハッシュ空間の大きさを取得します。
    #[inline(always)]
    pub const fn bucket(&self) -> usize {
        self.bucket
    }

    /// 文字n-gramの最小長を取得します。
    #[inline(always)]
    pub const fn min_n(&self) -> usize {
        self.min_n
    }

    /// 文字n-gramの最大長を取得します。
    #[inline(always)]
    pub const fn max_n(&self) -> usize {
        self.max_n
    }

    /// 文字n-gramが有効かどうかを返します。
    #[inline(always)]
    pub const fn uses_subwords(&self) -> bool {
        self.max_n > 0
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| FastTextError::invalid_format(field, format!("must be non-negative, got {value}")))
}
