//! エラー型の定義
//!
//! このモジュールは、fasttext-vectorsライブラリで使用されるすべてのエラー型を定義します。
//! 読み込み時のエラー(入力の途中終了、マジックナンバー不一致、量子化モデルなど)は
//! 読み込み全体を中断し、クエリ時のエラー(次元不一致、NaN)はその呼び出しにのみ影響します。

use std::error::Error;
use std::fmt::{self, Debug};
use std::path::PathBuf;

/// fasttext-vectors専用のResult型
///
/// エラー型としてデフォルトで[`FastTextError`]を使用します。
pub type Result<T, E = FastTextError> = std::result::Result<T, E>;

/// fasttext-vectorsのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 各バリアントは特定のエラー条件に対応しています。
#[derive(Debug, thiserror::Error)]
pub enum FastTextError {
    /// 入力途中終了エラー
    ///
    /// フィールドを読み終える前にストリームが終端に達した場合に発生します。
    #[error("TruncatedInputError: the input ended while reading {field}")]
    TruncatedInput {
        /// 読み込み中だったフィールドの名前
        field: &'static str,
    },

    /// マジックナンバーまたはバージョンの不一致エラー
    ///
    /// マジックナンバーが一致しない場合、`version`は読み込まれていないため`None`になります。
    #[error("BadMagicOrVersionError: magic={magic}, version={version:?}")]
    BadMagicOrVersion {
        /// 入力から読み込んだマジックナンバー
        magic: i32,
        /// 入力から読み込んだフォーマットバージョン
        version: Option<i32>,
    },

    /// 未知のモデル種別エラー
    ///
    /// モデル種別の値が1(CBOW)、2(Skip-gram)、3(Supervised)のいずれでもない場合に発生します。
    #[error("UnknownModelKindError: {0}")]
    UnknownModelKind(i32),

    /// 量子化モデルエラー
    ///
    /// 量子化されたモデルはサポートしていません。
    #[error("UnsupportedQuantizedModelError: quantized models cannot be loaded")]
    UnsupportedQuantizedModel,

    /// 次元不一致エラー
    ///
    /// ベクトルと行列の形状が一致しない場合に発生します。
    #[error("DimensionMismatchError: expected {expected}, but got {actual}")]
    DimensionMismatch {
        /// 期待された長さ
        expected: usize,
        /// 実際の長さ
        actual: usize,
    },

    /// 数値不安定エラー
    ///
    /// 内積の結果がNaNになった場合に発生します。行列データの破損を示します。
    #[error("NumericInstabilityError: encountered NaN")]
    NumericInstability,

    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// UTF-8エンコーディングエラー
    ///
    /// 語彙の単語が有効なUTF-8でない場合に発生します。
    #[error(transparent)]
    Utf8(std::string::FromUtf8Error),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(PathBuf),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl FastTextError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フィールド名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 次元不一致エラーを生成します
    #[inline]
    pub(crate) const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フィールドの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

impl From<std::string::FromUtf8Error> for FastTextError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::Utf8(error)
    }
}
