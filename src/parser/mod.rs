//! Document access: the page-geometry boundary, its lopdf-backed
//! implementation and the extraction options.

mod backend;
mod lopdf_backend;
mod options;

pub use backend::{
    decode_text_simple, JsonPageSource, PageSource, RawBlock, RawLine, RawPage, RawSpan,
    FLAG_BOLD,
};
pub use lopdf_backend::LopdfBackend;
pub use options::{
    BatchOptions, OutlineOptions, PageSelection, SizeBand, DEFAULT_BODY_TEXT_MAX,
    DEFAULT_DENYLIST, DEFAULT_SIZE_BANDS,
};
