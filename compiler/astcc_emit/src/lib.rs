//! C++ code generation for astcc.
//!
//! [`emit_cpp`] renders a resolved and validated [`Schema`](astcc_ir::Schema)
//! into one C++ header: forward declarations, the node-type enumeration,
//! includes, one class per node and the trailing code block.
//!
//! Constructor parameter threading lives in [`constructor_params`]: every
//! constructor, `Factory` call and base-class initialiser is rendered from
//! the same ancestor-first list.

mod context;
mod cpp;
mod signature;

pub use cpp::{emit_cpp, EmitOptions, DEFAULT_OUTPUT_NAME};
pub use signature::{constructor_params, InitParam, INIT_PREFIX};
