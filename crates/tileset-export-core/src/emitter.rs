use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;

use crate::category::{CategoryBuckets, CategoryTable};
use crate::error::{Result, TilesetError};
use crate::export::{EventCallback, ExportEvent, ExportOptions, StalePolicy};

/// A tileset file produced (or, in dry-run mode, planned) by the emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTileset {
    pub category: String,
    pub path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct EmitSummary {
    pub written: Vec<WrittenTileset>,
    /// Categories that had no items
    pub skipped: Vec<String>,
    /// Existing files of empty categories that were left in place
    pub stale: Vec<PathBuf>,
    /// Existing files of empty categories that were removed
    pub pruned: Vec<PathBuf>,
}

/// Render one tileset document.
///
/// The layout (tab indentation, self-closing `item` elements, trailing
/// newline) is what the map editor's existing tileset files use, so it is
/// kept byte for byte.
pub fn render_tileset(display_name: &str, ids: &[i64]) -> String {
    let mut out = String::with_capacity(96 + ids.len() * 24);
    out.push_str("<materials>\n");
    out.push_str(&format!("\t<tileset name=\"{}\">\n", escape(display_name)));
    out.push_str("\t\t<doodad>\n");
    for id in ids {
        out.push_str(&format!("\t\t\t<item id=\"{}\"/>\n", id));
    }
    out.push_str("\t\t</doodad>\n");
    out.push_str("\t</tileset>\n");
    out.push_str("</materials>\n");
    out
}

/// Writes one tileset file per non-empty category
pub struct Emitter {
    output_dir: PathBuf,
    options: ExportOptions,
}

impl Emitter {
    pub fn new(output_dir: PathBuf, options: ExportOptions) -> Self {
        Self {
            output_dir,
            options,
        }
    }

    /// Emit every category of `table` in declaration order.
    ///
    /// `buckets` must already be sorted. The first failure aborts; files
    /// written before it are left in place.
    pub fn emit(
        &self,
        table: &CategoryTable,
        buckets: &CategoryBuckets,
        on_event: EventCallback<'_>,
    ) -> Result<EmitSummary> {
        let notify = |event: ExportEvent| {
            if let Some(cb) = on_event {
                cb(&event);
            }
        };

        let mut summary = EmitSummary::default();
        let mut dir_ready = false;

        for (rule, ids) in buckets.iter(table) {
            let path = self.output_dir.join(&rule.filename);

            if ids.is_empty() {
                notify(ExportEvent::NoItems {
                    category: rule.key.clone(),
                });
                summary.skipped.push(rule.key.clone());

                if path.is_file() {
                    self.handle_stale(&path, &mut summary, &notify)?;
                }
                continue;
            }

            notify(ExportEvent::Writing {
                filename: rule.filename.clone(),
                count: ids.len(),
            });

            if !dir_ready {
                self.prepare_output_dir()?;
                dir_ready = true;
            }
            if !self.options.dry_run {
                fs::write(&path, render_tileset(&rule.display_name, ids))
                    .map_err(|e| TilesetError::write(&path, e))?;
            }

            summary.written.push(WrittenTileset {
                category: rule.key.clone(),
                path,
                count: ids.len(),
            });
        }

        Ok(summary)
    }

    fn handle_stale(
        &self,
        path: &Path,
        summary: &mut EmitSummary,
        notify: &dyn Fn(ExportEvent),
    ) -> Result<()> {
        match self.options.stale_policy {
            StalePolicy::Keep => {
                notify(ExportEvent::Stale {
                    path: path.to_path_buf(),
                });
                summary.stale.push(path.to_path_buf());
            }
            StalePolicy::Remove => {
                if !self.options.dry_run {
                    fs::remove_file(path).map_err(|e| TilesetError::write(path, e))?;
                }
                notify(ExportEvent::Pruned {
                    path: path.to_path_buf(),
                });
                summary.pruned.push(path.to_path_buf());
            }
        }
        Ok(())
    }

    /// In dry-run mode the directory is checked but never created.
    fn prepare_output_dir(&self) -> Result<()> {
        if self.output_dir.is_dir() {
            return Ok(());
        }

        if self.output_dir.exists() {
            return Err(TilesetError::write(
                &self.output_dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }

        if self.options.create_output_dir {
            if self.options.dry_run {
                return Ok(());
            }
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| TilesetError::write(&self.output_dir, e))?;
            return Ok(());
        }

        Err(TilesetError::write(
            &self.output_dir,
            io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryClassifier, CategoryRule};
    use crate::catalog::ItemRecord;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn item(id: i64, primary_type: &str) -> ItemRecord {
        ItemRecord::new(id).with_attribute("primarytype", primary_type)
    }

    fn sorted_buckets(classifier: &CategoryClassifier, items: Vec<ItemRecord>) -> CategoryBuckets {
        let mut buckets = CategoryBuckets::collect(classifier, items);
        buckets.sort();
        buckets
    }

    #[test]
    fn test_render_exact_layout() {
        let xml = render_tileset("Rocks", &[50, 100]);
        assert_eq!(
            xml,
            "<materials>\n\
             \t<tileset name=\"Rocks\">\n\
             \t\t<doodad>\n\
             \t\t\t<item id=\"50\"/>\n\
             \t\t\t<item id=\"100\"/>\n\
             \t\t</doodad>\n\
             \t</tileset>\n\
             </materials>\n"
        );
    }

    #[test]
    fn test_render_escapes_name() {
        let xml = render_tileset("Pots & \"Pans\"", &[1]);
        assert!(xml.contains("name=\"Pots &amp; &quot;Pans&quot;\""));
    }

    #[test]
    fn test_emit_writes_only_non_empty_categories() {
        let tmp = TempDir::new().unwrap();
        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(
            &classifier,
            vec![item(100, "rocks"), item(50, "rocks"), item(200, "unknown_category")],
        );

        let emitter = Emitter::new(tmp.path().to_path_buf(), ExportOptions::default());
        let summary = emitter.emit(classifier.table(), &buckets, None).unwrap();

        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.written[0].count, 2);
        assert_eq!(summary.skipped.len(), 5);

        let rocks = fs::read_to_string(tmp.path().join("rocks.xml")).unwrap();
        assert_eq!(rocks, render_tileset("Rocks", &[50, 100]));
        assert!(!rocks.contains("200"));

        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_emit_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("rubbish.xml"), "old content").unwrap();

        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(9, "rubbish")]);
        Emitter::new(tmp.path().to_path_buf(), ExportOptions::default())
            .emit(classifier.table(), &buckets, None)
            .unwrap();

        let content = fs::read_to_string(tmp.path().join("rubbish.xml")).unwrap();
        assert_eq!(content, render_tileset("Rubbish", &[9]));
    }

    #[test]
    fn test_events_follow_declaration_order() {
        let tmp = TempDir::new().unwrap();
        let table = CategoryTable::new(vec![
            CategoryRule::new("b", "b.xml", "B"),
            CategoryRule::new("a", "a.xml", "A"),
        ])
        .unwrap();
        let classifier = CategoryClassifier::new(table);
        let buckets = sorted_buckets(&classifier, vec![item(1, "a")]);

        let events = RefCell::new(Vec::new());
        let record = |e: &ExportEvent| events.borrow_mut().push(e.clone());
        Emitter::new(tmp.path().to_path_buf(), ExportOptions::default())
            .emit(classifier.table(), &buckets, Some(&record))
            .unwrap();

        assert_eq!(
            events.into_inner(),
            vec![
                ExportEvent::NoItems {
                    category: "b".to_string()
                },
                ExportEvent::Writing {
                    filename: "a.xml".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_stale_file_kept_by_default() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("remains.xml");
        fs::write(&stale, "previous run").unwrap();

        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(1, "rocks")]);
        let summary = Emitter::new(tmp.path().to_path_buf(), ExportOptions::default())
            .emit(classifier.table(), &buckets, None)
            .unwrap();

        assert_eq!(summary.stale, vec![stale.clone()]);
        assert!(summary.pruned.is_empty());
        assert_eq!(fs::read_to_string(&stale).unwrap(), "previous run");
    }

    #[test]
    fn test_stale_file_removed_when_pruning() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("remains.xml");
        fs::write(&stale, "previous run").unwrap();

        let options = ExportOptions {
            stale_policy: StalePolicy::Remove,
            ..Default::default()
        };
        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, Vec::new());
        let summary = Emitter::new(tmp.path().to_path_buf(), options)
            .emit(classifier.table(), &buckets, None)
            .unwrap();

        assert_eq!(summary.pruned, vec![stale.clone()]);
        assert!(!stale.exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("refuse.xml");
        fs::write(&stale, "previous run").unwrap();

        let options = ExportOptions {
            dry_run: true,
            stale_policy: StalePolicy::Remove,
            ..Default::default()
        };
        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(5, "rocks")]);
        let summary = Emitter::new(tmp.path().to_path_buf(), options)
            .emit(classifier.table(), &buckets, None)
            .unwrap();

        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.pruned, vec![stale.clone()]);
        assert!(stale.exists());
        assert!(!tmp.path().join("rocks.xml").exists());
    }

    #[test]
    fn test_missing_output_dir_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("tilesets");

        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(5, "rocks")]);
        let err = Emitter::new(missing.clone(), ExportOptions::default())
            .emit(classifier.table(), &buckets, None)
            .unwrap_err();

        assert!(err.is_write());
        assert!(!missing.exists());
    }

    #[test]
    fn test_dry_run_still_checks_output_dir() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("tilesets");

        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(5, "rocks")]);
        let dry_run = ExportOptions {
            dry_run: true,
            ..Default::default()
        };
        let err = Emitter::new(missing.clone(), dry_run)
            .emit(classifier.table(), &buckets, None)
            .unwrap_err();
        assert!(err.is_write());

        let dry_run_create = ExportOptions {
            dry_run: true,
            create_output_dir: true,
            ..Default::default()
        };
        let summary = Emitter::new(missing.clone(), dry_run_create)
            .emit(classifier.table(), &buckets, None)
            .unwrap();
        assert_eq!(summary.written.len(), 1);
        assert!(!missing.exists());
    }

    #[test]
    fn test_missing_output_dir_created_on_request() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("data/materials/tilesets");

        let options = ExportOptions {
            create_output_dir: true,
            ..Default::default()
        };
        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(5, "kitchen tools")]);
        Emitter::new(missing.clone(), options)
            .emit(classifier.table(), &buckets, None)
            .unwrap();

        assert!(missing.join("kitchen.xml").is_file());
    }

    #[test]
    fn test_output_path_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let not_dir = tmp.path().join("tilesets");
        fs::write(&not_dir, "").unwrap();

        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(5, "rocks")]);
        let err = Emitter::new(not_dir, ExportOptions::default())
            .emit(classifier.table(), &buckets, None)
            .unwrap_err();
        assert!(matches!(err, TilesetError::Write { .. }));
    }

    #[test]
    fn test_all_empty_needs_no_output_dir() {
        let tmp = TempDir::new().unwrap();
        let classifier = CategoryClassifier::builtin();
        let buckets = sorted_buckets(&classifier, vec![item(1, "nothing")]);
        let summary = Emitter::new(tmp.path().join("missing"), ExportOptions::default())
            .emit(classifier.table(), &buckets, None)
            .unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(summary.skipped.len(), 6);
    }
}
