use thiserror::Error;

/// Failures of generated content that abort a run before anything is published.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThreadError {
    #[error("post {index} is too long: {length} characters (max {max})")]
    PostTooLong {
        index: usize,
        length: usize,
        max: usize,
    },

    #[error("generated content contains no posts")]
    EmptyThread,
}
