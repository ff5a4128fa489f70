use thiserror::Error;

/// A native call refused to run at all.  Distinct from a command being
/// refused, which is reported per command through `NativeStatus`.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("native call {call} unavailable (code {code})")]
    Unavailable { call: &'static str, code: i32 },

    /// A batched call received parallel arrays of different lengths.
    #[error("native call {call} got misaligned arrays ({expected} commands, {actual} in `{array}`)")]
    MisalignedArrays { call: &'static str, array: &'static str, expected: usize, actual: usize },
}

pub type NativeResult<T> = Result<T, NativeError>;
