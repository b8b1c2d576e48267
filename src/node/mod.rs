//! Workflow host adapter
//!
//! Wraps the spreadsheet converter in the host's item-passing protocol:
//! items in, parameters resolved per item, items with binary attachments out.

pub mod context;
pub mod descriptor;
pub mod executor;
pub mod item;
pub mod parameters;

pub use context::{ExecutionContext, StaticContext};
pub use descriptor::{description, NodeDescription};
pub use executor::ExcelConverterNode;
pub use item::{BinaryData, Item};
pub use parameters::{InputMode, NodeParameters, NodeSettings, OutputLayout};
