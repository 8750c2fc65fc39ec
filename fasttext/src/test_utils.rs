//! テスト用ユーティリティ
//!
//! 合成モデルのバイト列を生成する[`ModelBuilder`]を提供します。

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use hashbrown::HashMap;

use crate::args::ModelKind;
use crate::config::ByteOrder;
use crate::model::FILE_FORMAT_MAGIC;

/// 既定の単語埋め込み行列の値。
pub fn input_value(i: usize, j: usize) -> f32 {
    1.0 + i as f32 + 0.125 * j as f32
}

/// 既定のサブワード埋め込み行列の値。
pub fn ngram_value(b: usize, j: usize) -> f32 {
    0.5 * b as f32 - 0.25 * j as f32
}

/// 合成モデルのバイト列を組み立てます。
///
/// 既定では次元4、Skip-gram、バケット数10、`min_n = max_n = 1`、バージョン12の
/// ビッグエンディアンのモデルになります。
pub struct ModelBuilder {
    order: ByteOrder,
    magic: i32,
    version: i32,
    dim: i32,
    model: i32,
    bucket: i32,
    min_n: i32,
    max_n: i32,
    words: Vec<Vec<u8>>,
    quantized: bool,
    shape: Option<(i64, i64)>,
    omit_matrices: bool,
    input_rows: HashMap<usize, Vec<f32>>,
    ngram_rows: HashMap<usize, Vec<f32>>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            order: ByteOrder::BigEndian,
            magic: FILE_FORMAT_MAGIC,
            version: 12,
            dim: 4,
            model: ModelKind::SkipGram.value(),
            bucket: 10,
            min_n: 1,
            max_n: 1,
            words: vec![],
            quantized: false,
            shape: None,
            omit_matrices: false,
            input_rows: HashMap::new(),
            ngram_rows: HashMap::new(),
        }
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn magic(mut self, magic: i32) -> Self {
        self.magic = magic;
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn dim(mut self, dim: i32) -> Self {
        self.dim = dim;
        self
    }

    pub fn model(mut self, model: i32) -> Self {
        self.model = model;
        self
    }

    pub fn bucket(mut self, bucket: i32) -> Self {
        self.bucket = bucket;
        self
    }

    pub fn ngram_range(mut self, min_n: i32, max_n: i32) -> Self {
        self.min_n = min_n;
        self.max_n = max_n;
        self
    }

    pub fn words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words = words
            .into_iter()
            .map(|w| w.as_ref().as_bytes().to_vec())
            .collect();
        self
    }

    pub fn raw_word(mut self, word: &[u8]) -> Self {
        self.words.push(word.to_vec());
        self
    }

    /// 量子化フラグを立てます。フラグ以降のバイトは出力されません。
    pub fn quantized(mut self) -> Self {
        self.quantized = true;
        self
    }

    /// 行列ヘッダの`m`と`n`を上書きします。
    pub fn matrix_shape(mut self, m: i64, n: i64) -> Self {
        self.shape = Some((m, n));
        self
    }

    /// 行列ヘッダの後のデータを出力しません。
    pub fn omit_matrices(mut self) -> Self {
        self.omit_matrices = true;
        self
    }

    pub fn input_row(mut self, i: usize, row: &[f32]) -> Self {
        self.input_rows.insert(i, row.to_vec());
        self
    }

    pub fn ngram_row(mut self, b: usize, row: &[f32]) -> Self {
        self.ngram_rows.insert(b, row.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut w = Writer {
            order: self.order,
            buf: vec![],
        };

        w.i32(self.magic);
        w.i32(self.version);

        w.i32(self.dim);
        for unused in [5, 5, 5, 5, 1, 1] {
            w.i32(unused);
        }
        w.i32(self.model);
        w.i32(self.bucket);
        w.i32(self.min_n);
        w.i32(self.max_n);
        w.i32(100);
        w.f64(1e-4);

        w.i32(self.words.len() as i32);
        w.i32(self.words.len() as i32);
        w.i32(0);
        w.i64(1000);
        w.i64(-1);
        for word in &self.words {
            w.buf.extend_from_slice(word);
            w.buf.push(0);
            w.i64(3);
            w.buf.push(0);
        }

        w.buf.push(u8::from(self.quantized));
        if self.quantized {
            return w.buf;
        }

        let (m, n) = self.shape.unwrap_or_else(|| {
            let rows = self.words.len().max(self.bucket.max(0) as usize);
            (2 * rows as i64, i64::from(self.dim))
        });
        w.i64(m);
        w.i64(n);
        if self.omit_matrices {
            return w.buf;
        }

        let rows = m.max(0) as usize / 2;
        let cols = n.max(0) as usize;
        for i in 0..rows {
            for j in 0..cols {
                let x = match self.input_rows.get(&i) {
                    Some(row) => row[j],
                    None => input_value(i, j),
                };
                w.f32(x);
            }
        }
        for b in 0..rows {
            for j in 0..cols {
                let x = match self.ngram_rows.get(&b) {
                    Some(row) => row[j],
                    None => ngram_value(b, j),
                };
                w.f32(x);
            }
        }
        w.buf.push(0);
        w.buf
    }
}

struct Writer {
    order: ByteOrder,
    buf: Vec<u8>,
}

macro_rules! write_ordered {
    ($self:ident, $method:ident, $v:expr) => {
        match $self.order {
            ByteOrder::BigEndian => $self.buf.$method::<BigEndian>($v),
            ByteOrder::LittleEndian => $self.buf.$method::<LittleEndian>($v),
        }
        .unwrap()
    };
}

impl Writer {
    fn i32(&mut self, v: i32) {
        write_ordered!(self, write_i32, v);
    }

    fn i64(&mut self, v: i64) {
        write_ordered!(self, write_i64, v);
    }

    fn f32(&mut self, v: f32) {
        write_ordered!(self, write_f32, v);
    }

    fn f64(&mut self, v: f64) {
        write_ordered!(self, write_f64, v);
    }
}
