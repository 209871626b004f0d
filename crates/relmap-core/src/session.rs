use derive_more::Display;

///
/// SessionId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("session#{_0}")]
pub struct SessionId(pub u64);

///
/// SharedSessionContract
///
/// The part of a persistence session this layer consults. Lifecycle,
/// flushing, and transactions belong to the session itself.
///

pub trait SharedSessionContract {
    fn session_id(&self) -> SessionId;

    /// Whether the session can still accept work.
    fn is_open(&self) -> bool;
}
