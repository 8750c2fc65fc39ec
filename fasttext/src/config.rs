//! モデル読み込みの設定
//!
//! このモジュールは、モデルファイルを読み込む際のバイトオーダーや
//! 受け入れるフォーマットバージョンなどの設定を定義します。

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// 読み込み時に受け入れるフォーマットバージョンの上限。
pub const MAX_SUPPORTED_VERSION: i32 = 12;

/// 多バイトフィールドのバイトオーダー。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// ビッグエンディアン。
    BigEndian,
    /// リトルエンディアン。
    ///
    /// 一般的なx86/ARMホスト上の学習器が書き出したファイルはこの形式です。
    LittleEndian,
}

impl ByteOrder {
    /// 4バイトを`i32`として解釈します。
    #[inline(always)]
    pub(crate) fn decode_i32(self, bytes: &[u8; 4]) -> i32 {
        match self {
            Self::BigEndian => BigEndian::read_i32(bytes),
            Self::LittleEndian => LittleEndian::read_i32(bytes),
        }
    }

    /// マジックナンバーの4バイトからバイトオーダーを推定します。
    ///
    /// ビッグエンディアンを優先し、どちらの解釈でも`magic`に一致しない場合は`None`を返します。
    ///
    /// # 引数
    ///
    /// * `bytes` - ファイル先頭の4バイト
    /// * `magic` - 期待されるマジックナンバー
    pub(crate) fn detect(bytes: &[u8; 4], magic: i32) -> Option<Self> {
        [Self::BigEndian, Self::LittleEndian]
            .into_iter()
            .find(|order| order.decode_i32(bytes) == magic)
    }
}

/// モデル読み込みのオプション。
///
/// # 例
///
/// ```
/// use fasttext_vectors::{ByteOrder, LoadOptions};
///
/// let options = LoadOptions::new()
///     .byte_order(ByteOrder::LittleEndian)
///     .max_version(12);
/// assert_eq!(options.fixed_byte_order(), Some(ByteOrder::LittleEndian));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    byte_order: Option<ByteOrder>,
    max_version: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            byte_order: None,
            max_version: MAX_SUPPORTED_VERSION,
        }
    }
}

impl LoadOptions {
    /// デフォルトのオプションを作成します。
    ///
    /// バイトオーダーはマジックナンバーから自動判定され、
    /// バージョン[`MAX_SUPPORTED_VERSION`]までのファイルを受け入れます。
    pub fn new() -> Self {
        Self::default()
    }

    /// バイトオーダーを固定します。
    ///
    /// 固定した場合、マジックナンバーはそのバイトオーダーでのみ照合されます。
    ///
    /// # 引数
    ///
    /// * `order` - 使用するバイトオーダー
    pub const fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// バイトオーダーをマジックナンバーから自動判定するように設定します。
    pub const fn detect_byte_order(mut self) -> Self {
        self.byte_order = None;
        self
    }

    /// 受け入れるフォーマットバージョンの上限を設定します。
    ///
    /// # 引数
    ///
    /// * `version` - 上限のバージョン(この値を含む)
    pub const fn max_version(mut self, version: i32) -> Self {
        self.max_version = version;
        self
    }

    /// 固定されたバイトオーダーを取得します。自動判定の場合は`None`です。
    #[inline(always)]
    pub const fn fixed_byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// 受け入れるフォーマットバージョンの上限を取得します。
    #[inline(always)]
    pub const fn supported_version(&self) -> i32 {
        self.max_version
    }
}
