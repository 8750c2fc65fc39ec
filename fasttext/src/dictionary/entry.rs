//! 語彙エントリ
//!
//! 各単語の単語埋め込み行列上の行番号と、初回参照時に計算される
//! 文字n-gramバケット列のメモを保持します。

use std::sync::OnceLock;

/// 語彙に含まれる単語のエントリ。
#[derive(Debug)]
pub struct Entry {
    word: String,
    index: usize,
    ngrams: OnceLock<Vec<u32>>,
}

impl Entry {
    /// 新しいエントリを作成します。n-gramのメモは空の状態です。
    pub(crate) const fn new(word: String, index: usize) -> Self {
        Self {
            word,
            index,
            ngrams: OnceLock::new(),
        }
    }

    /// 単語の表層形を取得します。
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// 単語埋め込み行列上の行番号を取得します。
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// 計算済みのn-gramバケット列を取得します。未計算の場合は`None`です。
    ///
    /// `Some(&[])`は「n-gramを持たない」ことを、`None`は「まだ計算していない」ことを表します。
    #[inline(always)]
    pub fn cached_ngrams(&self) -> Option<&[u32]> {
        self.ngrams.get().map(Vec::as_slice)
    }

    /// n-gramバケット列を取得し、未計算の場合は`compute`で計算して保存します。
    ///
    /// 複数のスレッドから同時に呼び出された場合でも、保存される値は一つです。
    pub(crate) fn ngrams_or_init<F>(&self, compute: F) -> &[u32]
    where
        F: FnOnce() -> Vec<u32>,
    {
        self.ngrams.get_or_init(compute)
    }
}
