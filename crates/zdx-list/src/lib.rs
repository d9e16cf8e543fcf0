//! Virtualized list engine for terminal transcripts.
//!
//! Renders variable-height items lazily, caches their measured output, and
//! tracks scroll position, keyboard selection and mouse drag highlights
//! across item boundaries.

pub mod buffer;
pub mod cache;
pub mod config;
pub mod highlight;
pub mod item;
pub mod list;
pub mod mouse;
pub mod scroll;
pub mod scrollbar;
pub mod selection;

pub use config::ListConfig;
pub use item::{CellStyleFn, Focusable, FrameStyle, Highlightable, Insets, Item, TextItem};
pub use list::List;
pub use mouse::{END_OF_LINE, HighlightRange, ItemPoint, ItemSpan};
pub use scroll::{ScrollPosition, WheelAccumulator};
pub use scrollbar::{ScrollMetrics, Scrollbar};
