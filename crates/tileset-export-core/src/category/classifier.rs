//! Category Classifier
//!
//! アイテムの`primarytype`を[`CategoryTable`]の定義に基づいて分類する。

use crate::catalog::ItemRecord;

use super::builtin::CategoryRule;
use super::table::CategoryTable;

/// カテゴリ分類器
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: CategoryTable,
}

impl CategoryClassifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// ビルトインカテゴリのみで分類器を構築
    pub fn builtin() -> Self {
        Self::new(CategoryTable::builtin())
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// アイテムを分類
    ///
    /// `primarytype`を持たない、または未知の値を持つアイテムは
    /// どのカテゴリにも属さない（エラーではない）。
    pub fn classify(&self, item: &ItemRecord) -> Option<&CategoryRule> {
        item.primary_type().and_then(|key| self.table.get(key))
    }

    /// 所属カテゴリの宣言位置
    pub fn classify_index(&self, item: &ItemRecord) -> Option<usize> {
        item.primary_type().and_then(|key| self.table.position(key))
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}
