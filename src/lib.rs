//! maildown turns pipermail-style mailing-list archive pages into clean
//! Markdown: quoted replies, fenced code blocks, nested quotes with embedded
//! code, numbered link references and soft line breaks all survive the
//! archive's aggressive wrapping and entity encoding.

pub mod config;
pub mod digest;
pub mod linkref;
pub mod page;
pub mod passes;
pub mod pipeline;
pub mod utils;

pub use config::ArchiveConfig;
pub use digest::{ThreadEntry, ThreadTree};
pub use pipeline::{MessageMeta, Normalizer};
