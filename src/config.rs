//! Resource limits shared by the parser and the evaluator.

/// Default maximum nesting depth of a rule.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum number of nodes in a parsed rule.
pub const DEFAULT_MAX_NODES: usize = 100_000;

/// Bounds applied while parsing and evaluating a rule.
///
/// Both stages recurse once per nesting level, so `max_depth` caps stack usage
/// on adversarial input. `max_nodes` caps the size of the tree the parser
/// builds; `between` copies its subject, so chained ranges grow quickly.
///
/// ```
/// use ruleval::Limits;
///
/// let limits = Limits::default().with_max_depth(16).with_max_nodes(1_000);
/// assert_eq!(limits.max_depth, 16);
/// assert_eq!(limits.max_nodes, 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl Limits {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}
