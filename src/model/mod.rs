//! Data model for positioned text and rebuilt pages.
//!
//! Fragments come in from recognition with a single anchor point each. The
//! layout engine labels them with grid cells, groups them into lines, and the
//! result of each page is collected into a [`Document`] in request order.

mod document;
mod fragment;
mod page;

pub use document::{Document, DocumentMetadata, PageOutcome};
pub use fragment::{AnchorPoint, BoundingBox, Detection, Fragment, GridCell, PlacedFragment};
pub use page::{Line, PageImage, PageText};
