//! Builtin Category Definitions
//!
//! コード内で定義される固定の`primarytype` → tileset対応表。
//! 宣言順がそのままtilesetの出力順になる。

/// 分類に使う属性キー
pub const PRIMARY_TYPE_KEY: &str = "primarytype";

/// ビルトインカテゴリ定義
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        key: "musical instruments",
        filename: "musical_instruments.xml",
        display_name: "Musical Instruments",
    },
    BuiltinCategory {
        key: "kitchen tools",
        filename: "kitchen.xml",
        display_name: "Kitchen",
    },
    BuiltinCategory {
        key: "remains",
        filename: "remains.xml",
        display_name: "Remains",
    },
    BuiltinCategory {
        key: "rocks",
        filename: "rocks.xml",
        display_name: "Rocks",
    },
    BuiltinCategory {
        key: "rubbish",
        filename: "rubbish.xml",
        display_name: "Rubbish",
    },
    BuiltinCategory {
        key: "refuse",
        filename: "refuse.xml",
        display_name: "Refuse",
    },
];

/// ビルトインカテゴリの静的定義
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCategory {
    /// このカテゴリを選択する`primarytype`の値
    pub key: &'static str,
    /// 出力ファイル名（出力ディレクトリ相対）
    pub filename: &'static str,
    /// 出力ドキュメントに書き込むtileset名
    pub display_name: &'static str,
}

/// ランタイムカテゴリ定義
///
/// [`BUILTIN_CATEGORIES`]から構築されるか、別の対応表が必要な呼び出し側
/// （主にテスト）が直接渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub key: String,
    pub filename: String,
    pub display_name: String,
}

impl CategoryRule {
    pub fn new(
        key: impl Into<String>,
        filename: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<&BuiltinCategory> for CategoryRule {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self::new(builtin.key, builtin.filename, builtin.display_name)
    }
}
