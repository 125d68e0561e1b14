//! Product page extraction
//!
//! This module turns a fetched product page into a [`ProductRecord`]:
//! - `page`: the queryable document plus its URL
//! - `selectors`: the field table (query, value source, reducer per field)
//! - `fields`: pure cleanup of raw text (counts, platforms, whitespace)
//! - `product`: the extractor that runs the table and resolves prices

mod fields;
mod page;
mod product;
mod record;
pub mod selectors;

pub use fields::{clean_count, clean_platforms, clean_text, PLATFORM_CLASS_PREFIX};
pub use page::{child_elements, compile_selector, element_text, own_text, Page};
pub use product::ProductExtractor;
pub use record::ProductRecord;
