//! Data model for extracted tabular content.
//!
//! Two representations bridge detection and indexing: [`RawTable`] is the
//! unprocessed per-page detection result (possibly ragged), and [`Grid`] is
//! the rectangular form every downstream consumer works with.

mod table;

pub use table::{Grid, RawTable};
