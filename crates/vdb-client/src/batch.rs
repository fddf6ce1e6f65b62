//! Nesting counter for begin/end batches

/// What an `end` did to the batch depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEnd {
    /// Depth was already 0; nothing changed
    Unbalanced,
    /// An inner batch closed; still batched
    Inner,
    /// The outermost batch closed; time to refresh
    Outermost,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchDepth {
    depth: u32,
}

impl BatchDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_batched(&self) -> bool {
        self.depth > 0
    }

    pub fn begin(&mut self) -> u32 {
        self.depth = self.depth.saturating_add(1);
        self.depth
    }

    pub fn end(&mut self) -> BatchEnd {
        match self.depth {
            0 => BatchEnd::Unbalanced,
            1 => {
                self.depth = 0;
                BatchEnd::Outermost
            }
            _ => {
                self.depth -= 1;
                BatchEnd::Inner
            }
        }
    }
}
