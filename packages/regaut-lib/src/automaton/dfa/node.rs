/// A node in a DFA.
///
/// Invariant: A node cannot be both accepting and a trap node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DfaNode {
    pub accepting: bool,
    /// Whether the node is a trap node. Meaning from it there is no way to
    /// reach an accepting state. When it's unknown whether it's a trap
    /// node, this is set to false.
    pub trap: bool,
}

impl DfaNode {
    pub fn new(accepting: bool, trap: bool) -> Self {
        assert!(
            !(accepting && trap),
            "A node cannot be both accepting and a trap node"
        );
        DfaNode { accepting, trap }
    }

    pub fn accepting() -> Self {
        DfaNode::new(true, false)
    }

    pub fn non_accepting() -> Self {
        DfaNode::new(false, false)
    }

    pub fn trap() -> Self {
        DfaNode::new(false, true)
    }
}
