//! Configuration file sources, applied in precedence order by the facade.

pub mod global_file;
pub mod workspace_file;
