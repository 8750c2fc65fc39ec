//! 文字n-gramの抽出とハッシュ
//!
//! 単語を境界記号で囲み、UTF-8のコードポイント単位で文字n-gramを列挙して、
//! FNV-1aハッシュでバケットに割り当てます。学習器が出力したサブワード行列と
//! 一致させるため、列挙順序・除外規則・ハッシュ値はすべてバイト単位で互換です。

/// 単語の開始を表す境界記号。
pub const BOW: &str = "<";

/// 単語の終了を表す境界記号。
pub const EOW: &str = ">";

/// 文末を表す予約語。この語はn-gramを持ちません。
pub const EOS: &str = "</s>";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// UTF-8の継続バイトかどうかを判定します。
#[inline(always)]
const fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

/// 32ビットFNV-1aハッシュを計算します。
///
/// 各バイトは符号付きとして拡張されてからXORされます。ASCIIの範囲では
/// 通常のFNV-1aと同じ値になります。
///
/// # 例
///
/// ```
/// use fasttext_vectors::dictionary::subword::hash;
///
/// assert_eq!(hash(b""), 0x811c_9dc5);
/// assert_eq!(hash(b"a"), 0xe40c_292c);
/// ```
#[inline]
pub fn hash(bytes: &[u8]) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in bytes {
        // fastText XORs each byte as a signed char.
        h = (h ^ (b as i8 as u32)).wrapping_mul(FNV_PRIME);
    }
    h
}

/// 単語を境界記号で囲みます。
///
/// # 例
///
/// ```
/// use fasttext_vectors::dictionary::subword::wrap;
///
/// assert_eq!(wrap("ab"), "<ab>");
/// ```
pub fn wrap(word: &str) -> String {
    let mut wrapped = String::with_capacity(word.len() + BOW.len() + EOW.len());
    wrapped.push_str(BOW);
    wrapped.push_str(word);
    wrapped.push_str(EOW);
    wrapped
}

/// 境界記号で囲まれた単語の文字n-gramを順に列挙します。
///
/// 各コードポイントの開始位置から、長さ`1..=max_n`(コードポイント数)の
/// 部分文字列を短い順に生成し、`min_n`未満のものと、先頭または末尾に接する
/// 長さ1のもの(境界記号そのもの)を除いて`f`に渡します。
/// 重複は除去せず、出現順を保ちます。
///
/// # 引数
///
/// * `word` - 境界記号で囲まれた単語
/// * `min_n` - n-gramの最小長
/// * `max_n` - n-gramの最大長
/// * `f` - 各n-gramに対して呼び出される関数
pub fn for_each_ngram<'a, F>(word: &'a str, min_n: usize, max_n: usize, mut f: F)
where
    F: FnMut(&'a str),
{
    let bytes = word.as_bytes();
    for i in 0..bytes.len() {
        if is_continuation(bytes[i]) {
            continue;
        }
        let mut j = i;
        let mut n = 1;
        while j < bytes.len() && n <= max_n {
            j += 1;
            while j < bytes.len() && is_continuation(bytes[j]) {
                j += 1;
            }
            if n >= min_n && !(n == 1 && (i == 0 || j == bytes.len())) {
                f(&word[i..j]);
            }
            n += 1;
        }
    }
}

/// 境界記号で囲まれた単語の文字n-gramを列挙し、バケット番号の列を返します。
///
/// `bucket`が0の場合は割り当て先がないため、空の列を返します。
///
/// # 引数
///
/// * `word` - 境界記号で囲まれた単語
/// * `min_n` - n-gramの最小長
/// * `max_n` - n-gramの最大長
/// * `bucket` - バケット数
///
/// # 例
///
/// ```
/// use fasttext_vectors::dictionary::subword::{compute_ngrams, hash};
///
/// let ngrams = compute_ngrams("<ab>", 2, 2, 1000);
/// let expected: Vec<u32> = ["<a", "ab", "b>"]
///     .iter()
///     .map(|s| hash(s.as_bytes()) % 1000)
///     .collect();
/// assert_eq!(ngrams, expected);
/// ```
pub fn compute_ngrams(word: &str, min_n: usize, max_n: usize, bucket: usize) -> Vec<u32> {
    let mut ngrams = vec![];
    if bucket == 0 {
        return ngrams;
    }
    for_each_ngram(word, min_n, max_n, |ngram| {
        let h = hash(ngram.as_bytes()) as usize;
        ngrams.push((h % bucket) as u32);
    });
    ngrams
}

/// 境界記号で囲まれた単語の文字n-gramを文字列として返します。
///
/// 主にデバッグや表示のために使用します。
pub fn ngram_strings(word: &str, min_n: usize, max_n: usize) -> Vec<&str> {
    let mut ngrams = vec![];
    for_each_ngram(word, min_n, max_n, |ngram| ngrams.push(ngram));
    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash(b""), 0x811c_9dc5);
        assert_eq!(hash(b"a"), 0xe40c_292c);
        assert_eq!(hash(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_hash_sign_extends_high_bytes() {
        let b = 0xe3u8;
        let expected = (FNV_OFFSET_BASIS ^ 0xffff_ffe3).wrapping_mul(FNV_PRIME);
        assert_eq!(hash(&[b]), expected);
    }

    #[test]
    fn test_boundary_unigrams_are_excluded() {
        let ngrams = ngram_strings("<ab>", 1, 1);
        assert_eq!(ngrams, vec!["a", "b"]);

        let ngrams = ngram_strings("<ab>", 1, 6);
        assert!(!ngrams.contains(&"<"));
        assert!(!ngrams.contains(&">"));
        assert!(ngrams.contains(&"<ab>"));
    }

    #[test]
    fn test_window_order() {
        let ngrams = ngram_strings("<abc>", 3, 4);
        assert_eq!(ngrams, vec!["<ab", "<abc", "abc", "abc>", "bc>"]);
    }

    #[test]
    fn test_multibyte_codepoints() {
        let ngrams = ngram_strings("<東京>", 1, 2);
        assert_eq!(ngrams, vec!["<東", "東", "東京", "京", "京>"]);

        let ngrams = ngram_strings("<東京>", 3, 3);
        assert_eq!(ngrams, vec!["<東京", "東京>"]);
    }

    #[test]
    fn test_max_n_zero_disables_ngrams() {
        assert!(ngram_strings("<abc>", 0, 0).is_empty());
        assert!(compute_ngrams("<abc>", 3, 0, 100).is_empty());
    }

    #[test]
    fn test_compute_ngrams_keeps_duplicates() {
        let ngrams = compute_ngrams("<aaaa>", 2, 2, 1_000_000);
        let aa = hash(b"aa") % 1_000_000;
        assert_eq!(ngrams.iter().filter(|&&b| b == aa).count(), 3);
        assert_eq!(ngrams.len(), 5);
    }

    #[test]
    fn test_buckets_in_range() {
        for b in compute_ngrams("<internationalization>", 3, 6, 7) {
            assert!(b < 7);
        }
        assert!(compute_ngrams("<abc>", 1, 3, 0).is_empty());
    }
}
