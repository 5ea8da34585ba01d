//! The normalization passes, one module per stage.

pub mod blockquote_spacing;
pub mod column_zero_code;
pub mod continuation_orphans;
pub mod entities;
pub mod fenced_code;
pub mod header_renest;
pub mod light_indent_code;
pub mod link_extract;
pub mod list_item_code;
pub mod quote_separation;
pub mod separator_style;
pub mod tidy;
pub mod wrap_orphans;
