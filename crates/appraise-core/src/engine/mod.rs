pub(crate) mod pipeline;
pub mod supervisor;

pub use supervisor::Supervisor;
