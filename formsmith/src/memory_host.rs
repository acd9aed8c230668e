//! In-memory visual container for reordering without a real drag widget.
//!
//! `MemoryHost` stands in for the rendered list a drag-and-drop widget works
//! on. It keeps an ordered list of nodes: one element per item, each
//! followed by a decoration (think separator or drop indicator), and lets you
//! move elements around the way the widget would before a drop is reported.
//!
//! # Example
//!
//! ```rust
//! use formsmith::{MemoryHost, SortableList, reactive::ObservableList};
//!
//! let mut list = SortableList::new(ObservableList::from_vec(vec!["a", "b", "c"]));
//! let mut host = MemoryHost::new();
//! host.render(&mut list);
//!
//! let c = host.element_at(2).unwrap();
//! list.begin_drag(&host);
//! host.move_element(2, 0);
//! list.drop_item(&mut host, &c).unwrap();
//!
//! assert_eq!(list.items().to_vec(), vec!["c", "a", "b"]);
//! ```

use crate::{SortableHost, SortableList};

/// A node of a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostNode {
    /// Renders an item.
    Element(u64),
    /// Purely visual, carries no item.
    Decoration(u64),
}

impl HostNode {
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

/// An ordered list of nodes, mutated like a drag widget would.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    nodes: Vec<HostNode>,
    next_id: u64,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an item element.
    pub fn append_element(&mut self) -> HostNode {
        let node = HostNode::Element(self.next_id());
        self.nodes.push(node);
        node
    }

    /// Append a decorative node.
    pub fn append_decoration(&mut self) -> HostNode {
        let node = HostNode::Decoration(self.next_id());
        self.nodes.push(node);
        node
    }

    /// All nodes in order.
    pub fn nodes(&self) -> &[HostNode] {
        &self.nodes
    }

    /// Item elements in order.
    pub fn elements(&self) -> Vec<HostNode> {
        self.nodes.iter().copied().filter(HostNode::is_element).collect()
    }

    /// Item element at `index`, counting elements only.
    pub fn element_at(&self, index: usize) -> Option<HostNode> {
        self.nodes.iter().copied().filter(HostNode::is_element).nth(index)
    }

    fn node_index_of_element(&self, index: usize) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element())
            .map(|(i, _)| i)
            .nth(index)
    }

    /// Move the element at element index `from` so that it becomes the
    /// element at index `to`. Decorations stay where they are.
    ///
    /// Returns false if `from` is out of range. A `to` past the last element
    /// moves it to the very end.
    pub fn move_element(&mut self, from: usize, to: usize) -> bool {
        let Some(source) = self.node_index_of_element(from) else {
            return false;
        };
        let node = self.nodes.remove(source);
        match self.node_index_of_element(to) {
            Some(target) => self.nodes.insert(target, node),
            None => self.nodes.push(node),
        }
        true
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Rebuild the nodes from the list: one tagged element per item, each
    /// followed by a decoration.
    pub fn render<T>(&mut self, list: &mut SortableList<T, HostNode>)
    where
        T: Clone + PartialEq + 'static,
    {
        self.clear();
        list.clear_tags();
        for item in list.items().to_vec() {
            let element = self.append_element();
            list.tag_item(element, item);
            self.append_decoration();
        }
    }
}

impl SortableHost for MemoryHost {
    type Node = HostNode;

    fn child_nodes(&self) -> Vec<HostNode> {
        self.nodes.clone()
    }

    fn set_child_nodes(&mut self, nodes: Vec<HostNode>) {
        self.nodes = nodes;
    }

    fn element_position(&self, node: &HostNode) -> Option<usize> {
        if !node.is_element() {
            return None;
        }
        self.nodes
            .iter()
            .filter(|candidate| candidate.is_element())
            .position(|candidate| candidate == node)
    }
}
