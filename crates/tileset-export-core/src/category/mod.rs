//! # Category Module
//!
//! アイテムカタログの各アイテムを`primarytype`属性でtilesetに振り分ける。
//!
//! ## モジュール構成
//!
//! - `builtin`: 固定のカテゴリ対応表
//! - `table`: 差し替え可能なランタイムカテゴリ表
//! - `classifier`: アイテム → カテゴリの分類器
//! - `buckets`: カテゴリ別IDリスト
//!
//! ## 使用例
//!
//! ```rust
//! use tileset_export_core::category::{CategoryBuckets, CategoryClassifier};
//! use tileset_export_core::ItemRecord;
//!
//! let classifier = CategoryClassifier::builtin();
//! let items = vec![
//!     ItemRecord::new(100).with_attribute("primarytype", "rocks"),
//!     ItemRecord::new(50).with_attribute("primarytype", "rocks"),
//!     ItemRecord::new(200).with_attribute("primarytype", "unknown_category"),
//! ];
//!
//! let mut buckets = CategoryBuckets::collect(&classifier, items);
//! buckets.sort();
//!
//! let rocks = classifier.table().position("rocks").unwrap();
//! assert_eq!(buckets.get(rocks), &[50, 100]);
//! assert_eq!(buckets.unclassified(), 1);
//! ```

mod buckets;
mod builtin;
mod classifier;
mod table;

pub use buckets::CategoryBuckets;
pub use builtin::{BuiltinCategory, CategoryRule, BUILTIN_CATEGORIES, PRIMARY_TYPE_KEY};
pub use classifier::CategoryClassifier;
pub use table::CategoryTable;
