//! Statement templates and their assembly into aligned dialect statements.

mod assembler;
mod builtin;
mod template;

pub use assembler::{DialectStatement, Part, StatementAssembler, StatementPair};
pub use builtin::{builtin_templates, enabled_templates, BUILTIN_TEMPLATES};
pub use template::{Segment, Template};
