pub mod category;
pub mod definition;
pub mod diagnostic;
pub mod operation;

pub use category::*;
pub use definition::*;
pub use diagnostic::Diagnostic;
pub use operation::*;
