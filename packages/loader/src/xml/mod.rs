//! XML loading into an owned element tree.

mod element;

pub use element::{load_xml_file, qualified_name, Element};
