//! Declared migration steps, oldest first

mod v001_initial;

use super::Migration;

/// Every migration in chain order. New revisions are appended here.
pub fn all() -> Vec<Migration> {
    vec![v001_initial::migration()]
}
