pub mod catalog;
pub mod category;
pub mod config;
pub mod emitter;
pub mod error;
pub mod export;

pub use catalog::{parse_catalog_file, parse_catalog_str, ItemRecord};
pub use category::{
    BuiltinCategory, CategoryBuckets, CategoryClassifier, CategoryRule, CategoryTable,
    BUILTIN_CATEGORIES, PRIMARY_TYPE_KEY,
};
pub use config::Config;
pub use emitter::{render_tileset, EmitSummary, Emitter, WrittenTileset};
pub use error::{Result, TilesetError};
pub use export::{EventCallback, ExportEvent, ExportOptions, ExportReport, Exporter, StalePolicy};
