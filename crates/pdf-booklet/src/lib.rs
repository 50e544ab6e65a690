pub mod booklet;
mod constants;
mod metadata;
mod options;
mod page;
mod range;
mod stats;
pub mod tools;
mod types;

pub use booklet::{make_booklet, read_statistics};
pub use constants::{PAGES_PER_SHEET, padding_needed};
pub use metadata::{DocumentMetadata, PageMetadata, parse_metadata, parse_page_rect};
pub use options::*;
pub use page::{Dimensions, Page, PageId, PageNamer};
pub use range::{SkipSet, parse_range, resolve_index};
pub use stats::calculate_statistics;
pub use tools::{
    Burst, BurstOutput, Concatenate, Crop, CropMargins, ExternalTools, Impose, Inspect, Resize,
    Toolchain,
};
pub use types::*;
