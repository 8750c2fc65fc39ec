//! # fasttext-vectors
//!
//! fastTextの学習器が書き出したバイナリモデルを読み込み、単語ベクトルを再構成するライブラリです。
//!
//! ## 概要
//!
//! 学習済みモデルは、語彙内の単語ごとの埋め込み行列と、文字n-gramをハッシュで割り当てた
//! サブワード埋め込み行列を持ちます。このライブラリは両方の行列を読み込み、学習器と
//! ビット単位で同じn-gram列挙とハッシュを用いることで、語彙外の単語にもベクトルを与えます。
//!
//! ## 主な機能
//!
//! - **モデルの読み込み**: バイトオーダーの自動判定、フォーマットバージョンの検証、
//!   行列形状の検証
//! - **単語ベクトル**: 語彙内外の単語に対するサブワード平均ベクトル
//! - **n-gramのメモ化**: 語彙内の単語のn-gram列を初回参照時に計算して保持
//! - **近傍検索**: コサイン類似度、最近傍単語、アナロジー
//! - **圧縮ファイル**: Zstandard圧縮されたモデルのストリーミング読み込み
//!
//! ## 使用例
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use fasttext_vectors::Model;
//!
//! let model = Model::from_path("cc.ja.300.bin")?;
//!
//! let v = model.word_vector("東京");
//! assert_eq!(v.len(), model.dimension());
//!
//! for neighbor in model.nearest_neighbors("東京", 10)? {
//!     println!("{} {}", neighbor.word, neighbor.score);
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// モデルのハイパーパラメータ
pub mod args;

/// 読み込みオプション
pub mod config;

/// 語彙テーブルと文字n-gram
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 行優先の密行列
pub mod matrix;

/// モデルの読み込みと単語ベクトルの計算
pub mod model;

/// バイトオーダーを考慮したバイナリリーダー
mod reader;

/// 単精度浮動小数点数のベクトル
pub mod vector;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use args::{Args, ModelKind};
pub use config::{ByteOrder, LoadOptions};
pub use dictionary::{Dictionary, Entry};
pub use errors::{FastTextError, Result};
pub use matrix::Matrix;
pub use model::{Model, Neighbor};
pub use vector::Vector;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
