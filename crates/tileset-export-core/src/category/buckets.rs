//! Category Buckets
//!
//! カテゴリ別のアイテムIDリスト。表のルールごとに1つずつ保持する。

use crate::catalog::ItemRecord;

use super::builtin::CategoryRule;
use super::classifier::CategoryClassifier;
use super::table::CategoryTable;

/// カテゴリ別に集約したアイテムID（表の宣言順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBuckets {
    buckets: Vec<Vec<i64>>,
    unclassified: usize,
}

impl CategoryBuckets {
    /// ルールごとに空のバケットを作成
    pub fn for_table(table: &CategoryTable) -> Self {
        Self {
            buckets: vec![Vec::new(); table.len()],
            unclassified: 0,
        }
    }

    /// レコード列を分類して集約（ソートはしない）
    pub fn collect<I>(classifier: &CategoryClassifier, records: I) -> Self
    where
        I: IntoIterator<Item = ItemRecord>,
    {
        let mut buckets = Self::for_table(classifier.table());
        for record in records {
            match classifier.classify_index(&record) {
                Some(index) => buckets.buckets[index].push(record.id),
                None => buckets.unclassified += 1,
            }
        }
        buckets
    }

    /// 全バケットを昇順ソート（重複は残す）
    pub fn sort(&mut self) {
        for bucket in &mut self.buckets {
            bucket.sort_unstable();
        }
    }

    pub fn get(&self, index: usize) -> &[i64] {
        self.buckets.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// ルールとバケットの組を取得
    pub fn iter<'a>(
        &'a self,
        table: &'a CategoryTable,
    ) -> impl Iterator<Item = (&'a CategoryRule, &'a [i64])> + 'a {
        table
            .rules()
            .iter()
            .enumerate()
            .map(move |(i, rule)| (rule, self.get(i)))
    }

    /// どのカテゴリにも属さなかったレコード数
    pub fn unclassified(&self) -> usize {
        self.unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, primary_type: &str) -> ItemRecord {
        ItemRecord::new(id).with_attribute("primarytype", primary_type)
    }

    #[test]
    fn test_every_rule_has_a_bucket() {
        let table = CategoryTable::builtin();
        let buckets = CategoryBuckets::for_table(&table);
        assert_eq!(buckets.iter(&table).count(), 6);
        assert!(buckets.iter(&table).all(|(_, ids)| ids.is_empty()));
    }

    #[test]
    fn test_collect_and_sort() {
        let classifier = CategoryClassifier::builtin();
        let mut buckets = CategoryBuckets::collect(
            &classifier,
            vec![
                item(100, "rocks"),
                item(50, "rocks"),
                item(200, "unknown_category"),
                ItemRecord::new(300),
            ],
        );
        buckets.sort();

        let rocks = classifier.table().position("rocks").unwrap();
        assert_eq!(buckets.get(rocks), &[50, 100]);
        assert_eq!(buckets.unclassified(), 2);
    }

    #[test]
    fn test_sort_is_numeric() {
        let classifier = CategoryClassifier::builtin();
        let mut buckets = CategoryBuckets::collect(
            &classifier,
            vec![item(1000, "rubbish"), item(9, "rubbish"), item(100, "rubbish")],
        );
        buckets.sort();
        let rubbish = classifier.table().position("rubbish").unwrap();
        assert_eq!(buckets.get(rubbish), &[9, 100, 1000]);
    }

    #[test]
    fn test_duplicates_are_kept_adjacent() {
        let classifier = CategoryClassifier::builtin();
        let mut buckets = CategoryBuckets::collect(
            &classifier,
            vec![item(7, "remains"), item(3, "remains"), item(7, "remains")],
        );
        buckets.sort();
        let remains = classifier.table().position("remains").unwrap();
        assert_eq!(buckets.get(remains), &[3, 7, 7]);
    }

    #[test]
    fn test_get_out_of_range_is_empty() {
        let table = CategoryTable::builtin();
        let buckets = CategoryBuckets::for_table(&table);
        assert!(buckets.get(42).is_empty());
    }
}
