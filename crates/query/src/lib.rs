//! Outline requests against the host query interface.
//!
//! The host answers every query with the envelope `{code, msg, data}` where
//! `code == 0` means success. Outline consumers never treat a failure as
//! fatal: [`OutlineClient::doc_outline`] collapses transport errors, decode
//! errors and non-zero codes into an empty outline and logs them.
//!
//! The transport itself is a seam ([`QueryTransport`]) so the embedding
//! runtime decides how requests travel.

mod client;
mod envelope;
mod error;
mod outline;

pub use client::{OUTLINE_PATH, OutlineClient, QueryTransport};
pub use envelope::Envelope;
pub use error::{QueryError, Result};
pub use outline::{Heading, OutlineItem, flatten_outline, plain_text};
