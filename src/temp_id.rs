use std::fmt;

/// Negative id standing in for an entity created earlier in the same batch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(i64);

impl TempId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<TempId> for i64 {
    fn from(id: TempId) -> Self {
        id.0
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out -1, -2, -3, ... until reset.
#[derive(Debug)]
pub struct TempIdAllocator {
    next: i64,
}

impl Default for TempIdAllocator {
    fn default() -> Self {
        Self { next: -1 }
    }
}

impl TempIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TempId {
        let id = TempId(self.next);
        self.next -= 1;
        id
    }

    /// Keeps an existing id, or allocates the next temp id when it is missing.
    pub fn fill(&mut self, id: Option<i64>) -> i64 {
        match id {
            Some(id) => id,
            None => self.next_id().get(),
        }
    }

    /// Starts a new batch at -1.
    pub fn reset(&mut self) {
        self.next = -1;
    }
}
