//! Export pipeline: parse → classify → group → sort → emit.

use std::path::{Path, PathBuf};

use crate::catalog::parse_catalog_file;
use crate::category::{CategoryBuckets, CategoryClassifier, CategoryTable};
use crate::emitter::{Emitter, WrittenTileset};
use crate::error::Result;

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Parsing { path: PathBuf },
    Parsed { items: usize, unclassified: usize },
    Writing { filename: String, count: usize },
    NoItems { category: String },
    Stale { path: PathBuf },
    Pruned { path: PathBuf },
    Done,
}

/// Callback type for progress reporting
pub type EventCallback<'a> = Option<&'a dyn Fn(&ExportEvent)>;

/// What to do with an existing output file whose category is now empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Leave the file in place and report it
    #[default]
    Keep,
    /// Delete the file
    Remove,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
    pub stale_policy: StalePolicy,
    /// Create the output directory if it is missing
    pub create_output_dir: bool,
}

/// Outcome of a successful run
#[derive(Debug, Default)]
pub struct ExportReport {
    pub items: usize,
    pub unclassified: usize,
    pub written: Vec<WrittenTileset>,
    pub skipped: Vec<String>,
    pub stale: Vec<PathBuf>,
    pub pruned: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Runs the whole export for one catalog
pub struct Exporter {
    classifier: CategoryClassifier,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(table: CategoryTable, options: ExportOptions) -> Self {
        Self {
            classifier: CategoryClassifier::new(table),
            options,
        }
    }

    /// Exporter over the builtin categories
    pub fn builtin(options: ExportOptions) -> Self {
        Self::new(CategoryTable::builtin(), options)
    }

    /// Export `input` into one tileset per non-empty category under `output_dir`.
    ///
    /// Any parse or write error aborts the run. Files already written stay.
    pub fn run(
        &self,
        input: &Path,
        output_dir: &Path,
        on_event: EventCallback<'_>,
    ) -> Result<ExportReport> {
        let notify = |event: ExportEvent| {
            if let Some(cb) = on_event {
                cb(&event);
            }
        };

        notify(ExportEvent::Parsing {
            path: input.to_path_buf(),
        });
        let records = parse_catalog_file(input)?;
        let items = records.len();

        let mut buckets = CategoryBuckets::collect(&self.classifier, records);
        buckets.sort();
        notify(ExportEvent::Parsed {
            items,
            unclassified: buckets.unclassified(),
        });

        let emitter = Emitter::new(output_dir.to_path_buf(), self.options);
        let summary = emitter.emit(self.classifier.table(), &buckets, on_event)?;

        notify(ExportEvent::Done);

        Ok(ExportReport {
            items,
            unclassified: buckets.unclassified(),
            written: summary.written,
            skipped: summary.skipped,
            stale: summary.stale,
            pruned: summary.pruned,
            dry_run: self.options.dry_run,
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::builtin(ExportOptions::default())
    }
}
