//! 語彙上の近傍検索

use crate::errors::Result;
use crate::matrix::Matrix;
use crate::model::Model;
use crate::vector::Vector;

/// 近傍検索の結果。
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    /// クエリとのコサイン類似度
    pub score: f32,
    /// 語彙内の単語
    pub word: &'a str,
}

impl Model {
    /// 二つの単語ベクトルのコサイン類似度を計算します。
    ///
    /// どちらかのベクトルがゼロベクトルの場合は0を返します。
    ///
    /// # エラー
    ///
    /// このメソッドは通常エラーを返しませんが、戻り値の型は[`Vector::cosine`]に従います。
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        self.word_vector(a).cosine(&self.word_vector(b))
    }

    /// 語彙の中から単語に最も近い`k`個の単語を検索します。
    ///
    /// クエリの単語自身は結果に含まれません。スコアが等しい場合は語彙の順序を保ちます。
    /// 初回の呼び出しで語彙全体の正規化済みベクトル表を構築します。
    ///
    /// # 引数
    ///
    /// * `word` - クエリの単語(語彙外でも構いません)
    /// * `k` - 返す単語の最大数
    ///
    /// # エラー
    ///
    /// 行列にNaNが含まれる場合、[`FastTextError::NumericInstability`](crate::FastTextError::NumericInstability)を返します。
    pub fn nearest_neighbors(&self, word: &str, k: usize) -> Result<Vec<Neighbor<'_>>> {
        let query = self.word_vector(word);
        self.find_nearest(query, k, &[word])
    }

    /// `a - b + c`に最も近い`k`個の単語を検索します。
    ///
    /// 各単語ベクトルは加算前に正規化されます。`a`、`b`、`c`は結果に含まれません。
    ///
    /// # 例
    ///
    /// `analogies("king", "man", "woman", 1)`は「man に対する king は woman に対する何か」を求めます。
    ///
    /// # エラー
    ///
    /// [`Model::nearest_neighbors`]と同じです。
    pub fn analogies(&self, a: &str, b: &str, c: &str, k: usize) -> Result<Vec<Neighbor<'_>>> {
        let mut query = Vector::new(self.dimension());
        for (word, sign) in [(a, 1.0), (b, -1.0), (c, 1.0)] {
            let v = self.word_vector(word);
            query.add_vector_scaled(&v, sign / (v.norm() + 1e-8))?;
        }
        self.find_nearest(query, k, &[a, b, c])
    }

    fn find_nearest(&self, mut query: Vector, k: usize, banned: &[&str]) -> Result<Vec<Neighbor<'_>>> {
        let table = self.normalized_word_vectors();
        let norm = query.norm();
        if norm > 0.0 {
            query.mul(1.0 / norm);
        }

        let mut scores = Vector::new(table.rows());
        scores.mul_matrix(table, &query)?;

        let entries = self.dictionary().entries();
        let mut ranked: Vec<(usize, f32)> = scores
            .as_slice()
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| !banned.contains(&entries[i].word()))
            .collect();
        // Stable sort, so equal scores stay in vocabulary order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(i, score)| Neighbor {
                score,
                word: entries[i].word(),
            })
            .collect())
    }

    /// 語彙全体の単語ベクトルをL2正規化した表を取得します。初回のみ構築します。
    fn normalized_word_vectors(&self) -> &Matrix {
        self.word_vectors.get_or_init(|| {
            let dim = self.dimension();
            let words = self.dictionary().len();
            log::debug!("[fasttext-vectors] Precomputing {words} word vectors");
            let mut data = Vec::with_capacity(words * dim);
            for entry in self.dictionary().entries() {
                data.extend_from_slice(self.word_vector(entry.word()).as_slice());
            }
            let mut table = Matrix::from_raw(words, dim, data);
            table.l2_normalize_rows();
            table
        })
    }
}
