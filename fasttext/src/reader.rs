//! バイナリフィールドの逐次読み込み
//!
//! このモジュールは、モデルファイルを先頭から順に読み進めるための
//! プリミティブなデコーダーを提供します。シークは行わず、各フィールドは
//! ストリームに現れる順序で一度だけ消費されます。

use std::io::{self, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::config::ByteOrder;
use crate::errors::{FastTextError, Result};

/// 行列データを読み込む際の一度あたりの要素数。
const FLOAT_CHUNK_LEN: usize = 4096;

/// 現在のバイトオーダーで`ReadBytesExt`のメソッドを呼び出します。
macro_rules! read_ordered {
    ($self:ident, $method:ident, $field:expr $(, $arg:expr)*) => {
        match $self.order {
            ByteOrder::BigEndian => $self.rdr.$method::<BigEndian>($($arg),*),
            ByteOrder::LittleEndian => $self.rdr.$method::<LittleEndian>($($arg),*),
        }
        .map_err(|e| io_error(e, $field))
    };
}

/// プリミティブ型のフィールドを順に読み込むリーダー。
///
/// 各メソッドは読み込み中のフィールド名を受け取り、ストリームが途中で終了した場合は
/// その名前を含む[`FastTextError::TruncatedInput`]を返します。
pub struct BinaryReader<R> {
    rdr: R,
    order: ByteOrder,
}

impl<R> BinaryReader<R>
where
    R: Read,
{
    /// 新しいリーダーを作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 読み込み元
    /// * `order` - 多バイトフィールドのバイトオーダー
    pub const fn new(rdr: R, order: ByteOrder) -> Self {
        Self { rdr, order }
    }

    /// バイトオーダーを変更します。
    ///
    /// マジックナンバーからバイトオーダーを判定した後に使用します。
    #[inline(always)]
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// 固定長のバイト列を読み込みます。
    ///
    /// # エラー
    ///
    /// `N`バイト未満しか残っていない場合、[`FastTextError::TruncatedInput`]を返します。
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.rdr
            .read_exact(&mut buf)
            .map_err(|e| io_error(e, field))?;
        Ok(buf)
    }

    /// 符号付き32ビット整数を読み込みます。
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        read_ordered!(self, read_i32, field)
    }

    /// 符号付き64ビット整数を読み込みます。
    pub fn read_i64(&mut self, field: &'static str) -> Result<i64> {
        read_ordered!(self, read_i64, field)
    }

    /// IEEE-754単精度浮動小数点数を読み込みます。
    pub fn read_f32(&mut self, field: &'static str) -> Result<f32> {
        read_ordered!(self, read_f32, field)
    }

    /// IEEE-754倍精度浮動小数点数を読み込みます。
    pub fn read_f64(&mut self, field: &'static str) -> Result<f64> {
        read_ordered!(self, read_f64, field)
    }

    /// 1バイトを読み込みます。
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.rdr.read_u8().map_err(|e| io_error(e, field))
    }

    /// 1バイトの真偽値を読み込みます。0以外は`true`です。
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        Ok(self.read_u8(field)? != 0)
    }

    /// NUL終端のUTF-8文字列を読み込みます。
    ///
    /// 終端のNULバイトは消費されますが、戻り値には含まれません。
    ///
    /// # エラー
    ///
    /// NULバイトの前にストリームが終了した場合は[`FastTextError::TruncatedInput`]を、
    /// バイト列が有効なUTF-8でない場合は[`FastTextError::Utf8`]を返します。
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let mut bytes = vec![];
        loop {
            match self.read_u8(field)? {
                0 => break,
                b => bytes.push(b),
            }
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// `dst`の長さ分の単精度浮動小数点数を読み込みます。
    pub fn read_f32_into(&mut self, dst: &mut [f32], field: &'static str) -> Result<()> {
        read_ordered!(self, read_f32_into, field, dst)
    }

    /// `len`個の単精度浮動小数点数を読み込みます。
    ///
    /// 確保する領域は実際に読み込めた要素数に応じて伸ばすため、`len`が
    /// ストリームの残りより極端に大きくても先に巨大な領域を確保することはありません。
    ///
    /// # エラー
    ///
    /// `len`個読み込む前にストリームが終了した場合、[`FastTextError::TruncatedInput`]を返します。
    pub fn read_f32_vec(&mut self, len: usize, field: &'static str) -> Result<Vec<f32>> {
        let mut data = Vec::with_capacity(len.min(FLOAT_CHUNK_LEN));
        let mut buf = [0.0; FLOAT_CHUNK_LEN];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = &mut buf[..remaining.min(FLOAT_CHUNK_LEN)];
            self.read_f32_into(chunk, field)?;
            data.extend_from_slice(chunk);
            remaining -= chunk.len();
        }
        Ok(data)
    }
}

fn io_error(e: io::Error, field: &'static str) -> FastTextError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => FastTextError::TruncatedInput { field },
        _ => FastTextError::IoError(e),
    }
}
