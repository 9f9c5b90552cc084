//! Document model
//!
//! The in-memory representation of the file being edited: ordered rows with
//! their tab-expanded render forms, the cursor, and the viewport offsets.

mod cursor;
mod document;
mod row;
mod viewport;

pub use cursor::Cursor;
pub use document::Document;
pub use row::Row;
pub use viewport::Viewport;
