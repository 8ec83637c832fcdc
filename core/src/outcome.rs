//! The explicit outcome of running one pipeline step.
//!
//! Keeping the four cases in one sum type means the seal boundary
//! classifies by pattern match, never by downcasting a caught value.

use crate::context::Context;
use crate::reply::{NotFound, Reply};

/// Result of running a pipeline step against a [`Context`].
#[derive(Debug)]
pub enum Outcome {
    /// The step succeeded; the (possibly extended) context flows on.
    Next(Context),
    /// A terminal reply, either a success or an intentional
    /// short-circuit (e.g. an authorization rejection). Routers do not
    /// fall through past a `Done`.
    Done(Reply),
    /// A routing miss; the next router branch is tried with the
    /// original context.
    Miss(NotFound),
    /// An unexpected failure, formatted into a reply at the seal
    /// boundary and never exposed raw to the client.
    Failure(anyhow::Error),
}

impl Outcome {
    /// Whether this outcome continues the chain.
    #[must_use]
    pub const fn is_next(&self) -> bool {
        matches!(self, Self::Next(_))
    }

    /// Whether this outcome is a terminal reply.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Whether this outcome is a routing miss.
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }

    /// Whether this outcome is an unexpected failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<Reply> for Outcome {
    fn from(reply: Reply) -> Self {
        Self::Done(reply)
    }
}

impl From<NotFound> for Outcome {
    fn from(miss: NotFound) -> Self {
        Self::Miss(miss)
    }
}

impl From<anyhow::Error> for Outcome {
    fn from(error: anyhow::Error) -> Self {
        Self::Failure(error)
    }
}
