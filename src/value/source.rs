use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::value::TableData;

/// A shared handle to a caller supplied [`TableData`], e.g. a cursor over
/// the results of a query.
///
/// Bind a source in a [`Chunk`][crate::Chunk] and loops iterate it directly
/// instead of copying it into a [`Table`][crate::Table]. A loop resets the
/// source before and after iterating it, so every loop sees all of its rows.
/// Clones share the same underlying source.
///
/// # Examples
///
/// ```
/// use chunky::{Chunk, Engine, Rows, Source, Table};
///
/// let table = Table::anonymous(["a", "b"]);
/// let mut chunk = Chunk::new();
/// chunk.set("rows", Source::new(Rows::from(table)));
///
/// let engine = Engine::new();
/// let template = engine.compile("{{.loop ~rows}}{{~anonymous}}{{/loop}}")?;
/// assert_eq!(template.render(&chunk)?, "ab");
/// assert_eq!(template.render(&chunk)?, "ab");
/// # Ok::<(), chunky::Error>(())
/// ```
#[derive(Clone)]
pub struct Source {
    inner: Arc<Mutex<dyn TableData + Send>>,
}

/// A source locked for the duration of one loop.
pub(crate) struct Locked<'a>(MutexGuard<'a, dyn TableData + Send + 'static>);

impl Source {
    /// Wraps a data source so that it can be bound in a chunk.
    pub fn new<D>(data: D) -> Self
    where
        D: TableData + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    /// Locks and rewinds the source for one loop invocation.
    ///
    /// Returns `None` if an enclosing loop is already iterating this source.
    pub(crate) fn lock(&self) -> Option<Locked<'_>> {
        let mut guard = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(err)) => err.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        guard.reset();
        Some(Locked(guard))
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}

/// Two handles are equal if they share the same source.
impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner).cast::<()>() == Arc::as_ptr(&other.inner).cast::<()>()
    }
}

impl Eq for Source {}

impl TableData for Locked<'_> {
    fn column_labels(&self) -> &[String] {
        self.0.column_labels()
    }

    fn has_next(&self) -> bool {
        self.0.has_next()
    }

    fn next_record(&mut self) -> Option<Vec<Option<String>>> {
        self.0.next_record()
    }

    fn reset(&mut self) {
        self.0.reset()
    }
}
