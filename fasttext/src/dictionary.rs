//! 語彙テーブル
//!
//! このモジュールは、モデルファイルに格納された語彙を読み込み、単語から
//! 単語埋め込み行列の行番号への対応を管理します。また、各単語の文字n-gram
//! バケット列を初回参照時に計算して保持します。
//!
//! - [`Dictionary`]: 語彙テーブル
//! - [`Entry`]: 単語ごとのエントリ
//! - [`subword`]: 文字n-gramの抽出とハッシュ
pub(crate) mod entry;
pub mod subword;

use std::borrow::Cow;
use std::hash::BuildHasher;
use std::io::Read;

use hashbrown::hash_table::{Entry as TableEntry, HashTable};
use hashbrown::DefaultHashBuilder;

use crate::args::Args;
use crate::dictionary::subword::EOS;
use crate::errors::{FastTextError, Result};
use crate::reader::BinaryReader;

pub use crate::dictionary::entry::Entry;

/// 単語から行番号への語彙テーブル。
///
/// エントリはファイル中の順序で保持され、`i`番目のエントリの行番号は`i`です。
/// 同じ単語が複数回現れた場合、検索では後に現れたエントリが優先されます。
pub struct Dictionary {
    args: Args,
    entries: Vec<Entry>,
    table: HashTable<usize>,
    hasher: DefaultHashBuilder,
}

impl Dictionary {
    /// 単語の列から語彙テーブルを作成します。
    ///
    /// # 引数
    ///
    /// * `args` - n-gramの計算に使用するハイパーパラメータ
    /// * `words` - 行番号の順に並んだ単語
    pub fn new<I, W>(args: Args, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let words = words.into_iter();
        let mut dict = Self::with_capacity(args, words.size_hint().0);
        for word in words {
            dict.push(word.into());
        }
        dict
    }

    fn with_capacity(args: Args, capacity: usize) -> Self {
        Self {
            args,
            entries: Vec::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hasher: DefaultHashBuilder::default(),
        }
    }

    /// ストリームから語彙を読み込みます。
    ///
    /// 語彙数に続く未使用のヘッダフィールドと、各単語の出現頻度・種別も読み飛ばします。
    ///
    /// # エラー
    ///
    /// - ストリームが途中で終了した場合は[`FastTextError::TruncatedInput`]
    /// - 語彙数が負の場合は[`FastTextError::InvalidFormat`]
    /// - 単語が有効なUTF-8でない場合は[`FastTextError::Utf8`]
    pub(crate) fn read<R>(rdr: &mut BinaryReader<R>, args: Args) -> Result<Self>
    where
        R: Read,
    {
        let size = rdr.read_i32("dict.size")?;
        rdr.read_i32("dict.nwords")?;
        rdr.read_i32("dict.nlabels")?;
        rdr.read_i64("dict.ntokens")?;
        rdr.read_i64("dict.pruneidx_size")?;

        let size = usize::try_from(size).map_err(|_| {
            FastTextError::invalid_format("dict.size", format!("must be non-negative, got {size}"))
        })?;

        // The size comes from the file; don't trust it for a huge up-front allocation.
        let mut dict = Self::with_capacity(args, size.min(1 << 20));
        for _ in 0..size {
            let word = rdr.read_string("dict.word")?;
            rdr.read_i64("dict.count")?;
            rdr.read_u8("dict.type")?;
            dict.push(word);
        }
        Ok(dict)
    }

    fn push(&mut self, word: String) {
        let index = self.entries.len();
        let Self {
            entries,
            table,
            hasher,
            ..
        } = self;
        let hash = hasher.hash_one(word.as_str());
        match table.entry(
            hash,
            |&i| entries[i].word() == word,
            |&i| hasher.hash_one(entries[i].word()),
        ) {
            TableEntry::Occupied(mut e) => *e.get_mut() = index,
            TableEntry::Vacant(e) => {
                e.insert(index);
            }
        }
        entries.push(Entry::new(word, index));
    }

    /// 語彙の大きさ(ファイル中のエントリ数)を取得します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 語彙が空かどうかを返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// n-gramの計算に使用するハイパーパラメータを取得します。
    #[inline(always)]
    pub const fn args(&self) -> &Args {
        &self.args
    }

    /// 単語のエントリを取得します。
    pub fn get(&self, word: &str) -> Option<&Entry> {
        let hash = self.hasher.hash_one(word);
        self.table
            .find(hash, |&i| self.entries[i].word() == word)
            .map(|&i| &self.entries[i])
    }

    /// 単語が語彙に含まれるかどうかを返します。
    #[inline(always)]
    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// 行番号`index`の単語を取得します。
    #[inline(always)]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(Entry::word)
    }

    /// すべてのエントリを行番号の順に取得します。
    #[inline(always)]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// すべての単語を行番号の順に返すイテレータを取得します。
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(Entry::word)
    }

    /// 単語の文字n-gramバケット列を取得します。
    ///
    /// 語彙に含まれる単語の場合、初回の呼び出しで計算した列をエントリに保存し、
    /// 以降はそれを借用して返します。語彙に含まれない単語の場合は毎回計算します。
    /// 文末記号`</s>`は常に空の列になります。
    pub fn ngrams(&self, word: &str) -> Cow<'_, [u32]> {
        match self.get(word) {
            Some(entry) => Cow::Borrowed(entry.ngrams_or_init(|| self.compute_ngrams(word))),
            None => Cow::Owned(self.compute_ngrams(word)),
        }
    }

    /// メモを使用せずに単語の文字n-gramバケット列を計算します。
    pub fn compute_ngrams(&self, word: &str) -> Vec<u32> {
        if word == EOS {
            return vec![];
        }
        subword::compute_ngrams(
            &subword::wrap(word),
            self.args.min_n(),
            self.args.max_n(),
            self.args.bucket(),
        )
    }
}
