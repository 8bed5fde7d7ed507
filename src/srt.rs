use std::time::Duration;

/// One timed caption entry. `index` and `text` are carried through
/// untouched; only `start` and `end` are ever rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub(crate) index: usize,
    pub(crate) start: Duration,
    pub(crate) end: Duration,
    pub(crate) text: Vec<String>,
}
