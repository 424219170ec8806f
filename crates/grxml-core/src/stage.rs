//! Stage trait: the single contract every pipeline step implements
use crate::context::ExecutionContext;

pub trait Stage<T>: Send + Sync {
    type Error;

    /// Unique stage id (e.g. "inline.rules.v1")
    fn id(&self) -> &'static str;

    /// Whether the same input always yields the same output (default: true)
    fn deterministic(&self) -> bool {
        true
    }

    fn run(&self, input: T, ctx: &ExecutionContext) -> Result<T, Self::Error>;
}
