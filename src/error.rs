use core::{convert::Infallible, fmt::Debug};

/// Errors reported by a [`ButtonState`](crate::ButtonState).
///
/// `E` is the error type of the input collaborator. Queries that never touch the pin use the
/// default `Infallible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: Debug = Infallible> {
    /// The input pin could not be configured or read
    #[error("input pin error: {0:?}")]
    Pin(E),
    /// An argument was outside the range the operation accepts
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
