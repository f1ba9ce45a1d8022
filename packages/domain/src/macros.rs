/// 数値ベースの ID 型を定義する宣言型マクロ
///
/// 管理画面は支払い・入居者を連番の数値 ID で扱うため、`u64` をラップする。
/// 以下を一括生成する:
/// - Newtype 構造体（`#[serde(transparent)]` で JSON 上は数値のまま）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)`
/// - `new()` / `as_u64()`
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display, derive_more::From,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(u64);

        impl $Name {
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }
    };
}
