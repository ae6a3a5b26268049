//! Record interface shared by the songpat pattern and query crates.
//!
//! Patterns and queries never look inside a song. They ask a [`Record`] for
//! tag values through a small set of accessors and treat tag names as opaque
//! keys. The crate also ships [`Song`], an in-memory record used by the
//! command line tool and the test suites, and [`DummyRecord`], which answers
//! every tag so patterns can be validated without real data.

mod dummy;
mod record;
mod song;
pub mod tags;

pub use dummy::{DUMMY_FILENAME, DummyRecord};
pub use record::Record;
pub use song::Song;
