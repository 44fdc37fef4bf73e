//! Category Table
//!
//! カテゴリ定義のランタイム表。
//! 宣言順を保持し、キーから定数時間で引ける。

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TilesetError};

use super::builtin::{CategoryRule, BUILTIN_CATEGORIES};

/// `primarytype`の値で引く順序付きカテゴリ表
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    index: HashMap<String, usize>,
}

impl CategoryTable {
    /// 明示的なルールから表を構築（順序は保持）
    ///
    /// - キーの重複はエラー
    /// - 出力ファイル名の重複もエラー（同じファイルを上書きし合うため）
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());
        let mut filenames = HashSet::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.key.clone(), i).is_some() {
                return Err(TilesetError::InvalidCategoryTable {
                    message: format!("duplicate category key '{}'", rule.key),
                });
            }
            if !filenames.insert(rule.filename.as_str()) {
                return Err(TilesetError::InvalidCategoryTable {
                    message: format!("duplicate output filename '{}'", rule.filename),
                });
            }
        }

        Ok(Self { rules, index })
    }

    /// ビルトインカテゴリのみで初期化
    pub fn builtin() -> Self {
        let rules: Vec<CategoryRule> = BUILTIN_CATEGORIES.iter().map(CategoryRule::from).collect();
        let index = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key.clone(), i))
            .collect();
        Self { rules, index }
    }

    pub fn get(&self, key: &str) -> Option<&CategoryRule> {
        self.position(key).map(|i| &self.rules[i])
    }

    /// カテゴリキーの宣言位置
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// 全ルールを取得（宣言順）
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}
