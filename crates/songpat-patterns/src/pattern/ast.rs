//! Syntax tree produced by the pattern parser.

/// An ordered run of nodes; the root of a pattern and the body of a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    /// The nodes in output order.
    pub children: Vec<Node>,
}

impl Sequence {
    /// Build a sequence from `children`.
    #[must_use]
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Report whether the sequence produces nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

/// A single pattern element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text copied to the output verbatim.
    Literal(String),
    /// The value of a tag.
    TagRef(String),
    /// `<tag|then|otherwise>`: one branch chosen by whether the tag is set.
    Conditional {
        /// The tested tag, or a query when it parses as one.
        tag: String,
        /// Output when the tag is non-empty.
        then: Sequence,
        /// Output when the tag is empty; `None` when no else branch was given.
        otherwise: Option<Sequence>,
    },
}
