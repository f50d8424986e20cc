use std::fmt::{Display, Formatter};

pub(crate) type Index = usize;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A node of the network, identified by its index. Nodes of a network are the dense range `0..node_count`.
pub struct NodeId(pub Index);

impl NodeId {
    #[inline]
    pub(crate) fn index(&self) -> Index {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
