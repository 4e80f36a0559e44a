/// Chunked undo history.
///
/// Edits recorded while a chunk is open are grouped; undoing pops one whole
/// chunk so an operator gesture and its derived write-backs revert together.
/// `open_chunk`/`close_chunk` nest; only the outermost close seals the chunk.
#[derive(Clone, Debug)]
pub struct UndoStack<E> {
    chunks: Vec<Chunk<E>>,
    open: Option<Chunk<E>>,
    depth: usize,
}

#[derive(Clone, Debug)]
pub struct Chunk<E> {
    name: String,
    edits: Vec<E>,
}

impl<E> Chunk<E> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Edits in recording order; replay them in reverse to roll back.
    pub fn into_edits(self) -> Vec<E> {
        self.edits
    }
}

impl<E> UndoStack<E> {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            open: None,
            depth: 0,
        }
    }

    pub fn open_chunk(&mut self, name: impl Into<String>) {
        if self.depth == 0 {
            self.open = Some(Chunk {
                name: name.into(),
                edits: Vec::new(),
            });
        }
        self.depth += 1;
    }

    /// Closing an already-closed stack is ignored, matching the host's
    /// tolerance for unbalanced chunk calls.
    pub fn close_chunk(&mut self) {
        match self.depth {
            0 => {}
            1 => {
                self.depth = 0;
                if let Some(chunk) = self.open.take()
                    && !chunk.edits.is_empty()
                {
                    self.chunks.push(chunk);
                }
            }
            _ => self.depth -= 1,
        }
    }

    /// Record an edit into the open chunk. Edits made outside a chunk are
    /// not undoable.
    pub fn record(&mut self, edit: E) {
        if let Some(chunk) = self.open.as_mut() {
            chunk.edits.push(edit);
        }
    }

    pub fn is_open(&self) -> bool {
        self.depth > 0
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Pop the most recent chunk for the caller to replay in reverse.
    pub fn undo(&mut self) -> Option<Chunk<E>> {
        self.chunks.pop()
    }
}

impl<E> Default for UndoStack<E> {
    fn default() -> Self {
        Self::new()
    }
}
