//! Built-in checkers. Each is a stateless unit struct.

mod contains;
mod equals;
mod has_len;
mod matches;
mod nil;
mod panics;
mod typing;

pub use contains::{Contains, DeepContains};
pub use equals::{DeepEquals, Equals};
pub use has_len::HasLen;
pub use matches::{ErrorMatches, Matches};
pub use nil::{IsNil, NotNil};
pub use panics::{PanicMatches, Panics};
pub use typing::{FitsTypeOf, Implements};
