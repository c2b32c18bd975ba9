pub mod pipeline;

pub use pipeline::EditPipeline;
