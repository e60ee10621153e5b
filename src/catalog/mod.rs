pub mod merge;
pub mod pipeline;
pub mod store;
pub mod submission;
pub mod validation;

pub use merge::*;
pub use pipeline::*;
pub use store::*;
pub use submission::*;
pub use validation::*;
