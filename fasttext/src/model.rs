//! 学習済みモデル
//!
//! このモジュールは、学習器が書き出したバイナリモデルを読み込み、語彙内外の
//! 単語に対して埋め込みベクトルを再構成する[`Model`]を提供します。
//!
//! # ファイルフォーマット
//!
//! ファイルは次の順に並びます。多バイトの値はすべて同じバイトオーダーです。
//!
//! 1. マジックナンバー(`i32`)とフォーマットバージョン(`i32`)
//! 2. ハイパーパラメータブロック([`Args`])
//! 3. 語彙([`Dictionary`])
//! 4. 量子化フラグ(1バイト)
//! 5. 行列の形状`m`、`n`(`i64`)と、`m/2 × n`の単語埋め込み行列および
//!    サブワード埋め込み行列(`f32`)
//! 6. 出力行列の量子化フラグ(1バイト)
//!
//! # 読み込み方法
//!
//! - [`Model::read`]: 任意のリーダーから読み込む
//! - [`Model::from_path`]: ファイルから読み込む
//! - [`Model::from_zstd`]: Zstandard圧縮ファイルから読み込む
mod neighbors;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

use crate::args::Args;
use crate::config::{ByteOrder, LoadOptions, MAX_SUPPORTED_VERSION};
use crate::dictionary::Dictionary;
use crate::errors::{FastTextError, Result};
use crate::matrix::Matrix;
use crate::reader::BinaryReader;
use crate::vector::Vector;

pub use crate::model::neighbors::Neighbor;

/// モデルファイルの先頭に置かれるマジックナンバー。
pub const FILE_FORMAT_MAGIC: i32 = 793_712_314;

/// 読み込み済みのモデル。
///
/// 読み込み後は不変で、複数のスレッドから同時にクエリできます。
/// 語彙内の単語のn-gram列と近傍検索用の正規化済みベクトル表は、
/// 初回の参照時に一度だけ計算されます。
pub struct Model {
    version: i32,
    args: Args,
    dict: Dictionary,
    input: Matrix,
    ngrams: Matrix,
    word_vectors: OnceLock<Matrix>,
}

impl Model {
    /// 既存の語彙と行列からモデルを作成します。
    ///
    /// ハイパーパラメータは`dict`が保持するものを使用し、フォーマットバージョンは
    /// [`MAX_SUPPORTED_VERSION`](crate::config::MAX_SUPPORTED_VERSION)になります。
    ///
    /// # 引数
    ///
    /// * `dict` - 語彙
    /// * `input` - 単語埋め込み行列。`i`行目が語彙の`i`番目の単語に対応します。
    /// * `ngrams` - サブワード埋め込み行列。`b`行目がバケット`b`に対応します。
    ///
    /// # エラー
    ///
    /// 行列の形状が語彙やハイパーパラメータと整合しない場合、
    /// [`FastTextError::InvalidArgument`]を返します。
    pub fn from_parts(dict: Dictionary, input: Matrix, ngrams: Matrix) -> Result<Self> {
        let args = *dict.args();
        if input.cols() != args.dim() || ngrams.cols() != args.dim() {
            return Err(FastTextError::invalid_argument(
                "input",
                format!(
                    "matrix widths {} and {} must equal the dimension {}",
                    input.cols(),
                    ngrams.cols(),
                    args.dim()
                ),
            ));
        }
        if input.rows() < dict.len() {
            return Err(FastTextError::invalid_argument(
                "input",
                format!(
                    "{} rows cannot cover a vocabulary of {} words",
                    input.rows(),
                    dict.len()
                ),
            ));
        }
        if args.uses_subwords() && (args.bucket() == 0 || ngrams.rows() < args.bucket()) {
            return Err(FastTextError::invalid_argument(
                "ngrams",
                format!(
                    "{} rows cannot cover {} buckets",
                    ngrams.rows(),
                    args.bucket()
                ),
            ));
        }
        Ok(Self::new(MAX_SUPPORTED_VERSION, args, dict, input, ngrams))
    }

    const fn new(version: i32, args: Args, dict: Dictionary, input: Matrix, ngrams: Matrix) -> Self {
        Self {
            version,
            args,
            dict,
            input,
            ngrams,
            word_vectors: OnceLock::new(),
        }
    }

    /// デフォルトのオプションでモデルを読み込みます。
    ///
    /// バイトオーダーはマジックナンバーから自動判定されます。先頭4バイトを
    /// まずビッグエンディアンとして解釈し、一致しなければリトルエンディアンとして
    /// 解釈します。リトルエンディアンのファイルも受け入れ、その場合は`warn`ログを出力します。
    ///
    /// # 引数
    ///
    /// * `rdr` - モデルファイルのリーダー
    ///
    /// # エラー
    ///
    /// [`Model::read_with_options`]を参照してください。
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        Self::read_with_options(rdr, &LoadOptions::default())
    }

    /// オプションを指定してモデルを読み込みます。
    ///
    /// 入力はバッファリングされないため、ファイルを直接渡す場合は
    /// [`BufReader`]で包むか[`Model::from_path`]を使用してください。
    ///
    /// [`LoadOptions::byte_order`]でバイトオーダーが固定されていない場合、
    /// マジックナンバーをビッグエンディアン、リトルエンディアンの順に試して
    /// バイトオーダーを判定します。固定されている場合はそのバイトオーダーでのみ
    /// マジックナンバーを照合します。
    ///
    /// 行列の領域は読み込んだデータ量に応じて確保されるため、ヘッダーの行数が
    /// 実際のデータより大きい切り詰められたファイルは
    /// [`FastTextError::TruncatedInput`]になります。
    ///
    /// # 引数
    ///
    /// * `rdr` - モデルファイルのリーダー
    /// * `options` - 読み込みオプション
    ///
    /// # エラー
    ///
    /// - マジックナンバーが一致しない、またはバージョンが上限を超える場合は
    ///   [`FastTextError::BadMagicOrVersion`]
    /// - モデルの種類が不明な場合は[`FastTextError::UnknownModelKind`]
    /// - 量子化モデルの場合は[`FastTextError::UnsupportedQuantizedModel`]
    /// - ストリームが途中で終了した場合は[`FastTextError::TruncatedInput`]
    /// - 行列の形状が語彙やハイパーパラメータと整合しない場合は
    ///   [`FastTextError::InvalidFormat`]
    /// - 語彙の単語が有効なUTF-8でない場合は[`FastTextError::Utf8`]
    pub fn read_with_options<R>(rdr: R, options: &LoadOptions) -> Result<Self>
    where
        R: Read,
    {
        let fallback = options.fixed_byte_order().unwrap_or(ByteOrder::BigEndian);
        let mut rdr = BinaryReader::new(rdr, fallback);

        let magic_bytes = rdr.read_array::<4>("magic")?;
        let order = match options.fixed_byte_order() {
            Some(order) => {
                (order.decode_i32(&magic_bytes) == FILE_FORMAT_MAGIC).then_some(order)
            }
            None => ByteOrder::detect(&magic_bytes, FILE_FORMAT_MAGIC),
        };
        let Some(order) = order else {
            return Err(FastTextError::BadMagicOrVersion {
                magic: fallback.decode_i32(&magic_bytes),
                version: None,
            });
        };
        rdr.set_byte_order(order);
        if order == ByteOrder::LittleEndian && options.fixed_byte_order().is_none() {
            log::warn!("[fasttext-vectors] Detected a little-endian model file");
        }

        let version = rdr.read_i32("version")?;
        if version > options.supported_version() {
            return Err(FastTextError::BadMagicOrVersion {
                magic: FILE_FORMAT_MAGIC,
                version: Some(version),
            });
        }

        let mut args = Args::read(&mut rdr)?;
        if args.apply_version_compat(version) {
            log::warn!(
                "[fasttext-vectors] Version {version} supervised model: character n-grams are disabled"
            );
        }
        log::debug!(
            "[fasttext-vectors] Read args: version={version}, dim={}, model={}, bucket={}, minn={}, maxn={}",
            args.dim(),
            args.model(),
            args.bucket(),
            args.min_n(),
            args.max_n()
        );

        let dict = Dictionary::read(&mut rdr, args)?;
        log::debug!("[fasttext-vectors] Read vocabulary of {} words", dict.len());

        if rdr.read_bool("quant_input")? {
            return Err(FastTextError::UnsupportedQuantizedModel);
        }

        let m = rdr.read_i64("matrix.m")?;
        let n = rdr.read_i64("matrix.n")?;
        let (rows, cols) = check_shape(m, n, &args, dict.len())?;

        let input = Matrix::read(&mut rdr, rows, cols, "input_matrix")?;
        let ngrams = Matrix::read(&mut rdr, rows, cols, "ngram_matrix")?;
        rdr.read_bool("quant_output")?;
        log::debug!("[fasttext-vectors] Read two {rows}x{cols} matrices");

        Ok(Self::new(version, args, dict, input, ngrams))
    }

    /// ファイルからモデルを読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - モデルファイルのパス
    ///
    /// # エラー
    ///
    /// - `path`がディレクトリの場合は[`FastTextError::PathIsDirectory`]
    /// - ファイルを開けない場合は[`FastTextError::InvalidArgument`]
    /// - その他は[`Model::read_with_options`]と同じです。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_path_with_options(path, &LoadOptions::default())
    }

    /// オプションを指定してファイルからモデルを読み込みます。
    ///
    /// # エラー
    ///
    /// [`Model::from_path`]を参照してください。
    pub fn from_path_with_options<P>(path: P, options: &LoadOptions) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = open_model_file(path)?;
        log::info!("[fasttext-vectors] Loading model from {}", path.display());
        let model = Self::read_with_options(BufReader::new(file), options)?;
        log::info!(
            "[fasttext-vectors] Loaded {} words with dimension {}",
            model.dict.len(),
            model.dimension()
        );
        Ok(model)
    }

    /// Zstandardで圧縮されたファイルからモデルを読み込みます。
    ///
    /// 展開はストリーミングで行われ、一時ファイルは作成しません。
    ///
    /// # 引数
    ///
    /// * `path` - 圧縮されたモデルファイルのパス
    ///
    /// # エラー
    ///
    /// [`Model::from_path`]のエラーに加えて、展開に失敗した場合は
    /// [`FastTextError::IoError`]を返します。
    pub fn from_zstd<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_zstd_with_options(path, &LoadOptions::default())
    }

    /// オプションを指定してZstandardで圧縮されたファイルからモデルを読み込みます。
    ///
    /// # エラー
    ///
    /// [`Model::from_zstd`]を参照してください。
    pub fn from_zstd_with_options<P>(path: P, options: &LoadOptions) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = open_model_file(path)?;
        log::info!("[fasttext-vectors] Loading zstd-compressed model from {}", path.display());
        let decoder = zstd::Decoder::new(file)?;
        let model = Self::read_with_options(decoder, options)?;
        log::info!(
            "[fasttext-vectors] Loaded {} words with dimension {}",
            model.dict.len(),
            model.dimension()
        );
        Ok(model)
    }

    /// 単語の埋め込みベクトルを計算します。
    ///
    /// 語彙内の単語は単語埋め込み行列の行とn-gramバケットの行の平均、
    /// 語彙外の単語はn-gramバケットの行の和を`n-gram数 + 1`で割ったものになります。
    /// n-gramを持たない語彙外の単語はゼロベクトルになります。
    ///
    /// # 例
    ///
    /// ```
    /// use fasttext_vectors::{Args, Dictionary, Matrix, Model, ModelKind};
    ///
    /// let args = Args::new(2, ModelKind::SkipGram, 0, 0, 0);
    /// let dict = Dictionary::new(args, ["hello"]);
    /// let input = Matrix::from_vec(1, 2, vec![0.5, -1.0])?;
    /// let model = Model::from_parts(dict, input, Matrix::zeros(0, 2))?;
    ///
    /// assert_eq!(model.word_vector("hello").as_slice(), &[0.5, -1.0]);
    /// assert_eq!(model.word_vector("world").as_slice(), &[0.0, 0.0]);
    /// # Ok::<(), fasttext_vectors::FastTextError>(())
    /// ```
    pub fn word_vector(&self, word: &str) -> Vector {
        let mut vec = Vector::new(self.args.dim());
        let ngrams = match self.dict.get(word) {
            Some(entry) => {
                vec.accumulate(self.input.row(entry.index()));
                Cow::Borrowed(entry.ngrams_or_init(|| self.dict.compute_ngrams(word)))
            }
            None => Cow::Owned(self.dict.compute_ngrams(word)),
        };
        for &bucket in ngrams.iter() {
            vec.accumulate(self.ngrams.row(bucket as usize));
        }
        if !ngrams.is_empty() {
            // The word's own slot counts even when the word is out of vocabulary.
            vec.mul(1.0 / (ngrams.len() as f32 + 1.0));
        }
        vec
    }

    /// 単語の文字n-gramバケット列を取得します。
    ///
    /// [`Dictionary::ngrams`]と同じです。
    #[inline(always)]
    pub fn word_ngrams(&self, word: &str) -> Cow<'_, [u32]> {
        self.dict.ngrams(word)
    }

    /// ハイパーパラメータを取得します。
    #[inline(always)]
    pub const fn args(&self) -> &Args {
        &self.args
    }

    /// ファイルのフォーマットバージョンを取得します。
    #[inline(always)]
    pub const fn version(&self) -> i32 {
        self.version
    }

    /// 埋め込みベクトルの次元を取得します。
    #[inline(always)]
    pub const fn dimension(&self) -> usize {
        self.args.dim()
    }

    /// 語彙を取得します。
    #[inline(always)]
    pub const fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// 単語埋め込み行列を取得します。
    #[inline(always)]
    pub const fn input_matrix(&self) -> &Matrix {
        &self.input
    }

    /// サブワード埋め込み行列を取得します。
    #[inline(always)]
    pub const fn ngram_matrix(&self) -> &Matrix {
        &self.ngrams
    }
}

fn open_model_file(path: &Path) -> Result<File> {
    if path.is_dir() {
        return Err(FastTextError::PathIsDirectory(path.to_path_buf()));
    }
    File::open(path).map_err(|e| {
        FastTextError::invalid_argument("path", format!("Failed to open model file: {e}"))
    })
}

/// 行列ヘッダの形状を検証し、各行列の`(rows, cols)`を返します。
///
/// 検証に通れば、語彙の行番号とすべてのバケット番号が行列の範囲内に収まります。
fn check_shape(m: i64, n: i64, args: &Args, vocab_len: usize) -> Result<(usize, usize)> {
    let m = usize::try_from(m).map_err(|_| {
        FastTextError::invalid_format("matrix.m", format!("must be non-negative, got {m}"))
    })?;
    let cols = usize::try_from(n).map_err(|_| {
        FastTextError::invalid_format("matrix.n", format!("must be non-negative, got {n}"))
    })?;
    if m % 2 != 0 {
        return Err(FastTextError::invalid_format(
            "matrix.m",
            format!("must be even, got {m}"),
        ));
    }
    if cols != args.dim() {
        return Err(FastTextError::invalid_format(
            "matrix.n",
            format!("expected the dimension {}, got {cols}", args.dim()),
        ));
    }
    let rows = m / 2;
    if rows < vocab_len {
        return Err(FastTextError::invalid_format(
            "matrix.m",
            format!("{rows} rows cannot cover a vocabulary of {vocab_len} words"),
        ));
    }
    if args.uses_subwords() && (args.bucket() == 0 || rows < args.bucket()) {
        return Err(FastTextError::invalid_format(
            "matrix.m",
            format!("{rows} rows cannot cover {} buckets", args.bucket()),
        ));
    }
    Ok((rows, cols))
}
