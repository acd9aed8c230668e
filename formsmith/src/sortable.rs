//! Keeps an observable list in sync with a visual container that a
//! drag-and-drop widget reorders on its own.
//!
//! The widget moves rendered nodes around before anyone else hears about it.
//! [`SortableList::drop_item`] reads where the node ended up, puts the
//! container back the way it was and applies the move to the list instead.
//! Whatever renders the list then updates the container from the list, so the
//! list stays the only source of truth for the order.

use std::collections::HashMap;
use std::hash::Hash;

use formsmith_types::reactive::{ObservableList, Reorderable};

/// The visual container a drag widget mutates.
pub trait SortableHost {
    /// Handle of one rendered node.
    type Node: Clone + Eq + Hash;

    /// All child nodes in order, decorative nodes included.
    fn child_nodes(&self) -> Vec<Self::Node>;

    /// Replace the child nodes, e.g. to restore a snapshot.
    fn set_child_nodes(&mut self, nodes: Vec<Self::Node>);

    /// Position of `node` among the item elements only, ignoring decorative
    /// nodes. `None` if `node` is not an item element of this container.
    fn element_position(&self, node: &Self::Node) -> Option<usize>;
}

/// Why a drop was rejected. The list is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The dropped node carries no item.
    #[error("Dropped node is not tagged with an item")]
    UntaggedNode,

    /// The node's item is no longer part of the list.
    #[error("Dropped item is not part of the list")]
    ItemNotFound,

    /// The node is not an item element of the container.
    #[error("Dropped node is not an element of the container")]
    NodeDetached,

    /// The node landed past the end of the list.
    #[error("Drop position {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// A move applied to the list by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    pub from: usize,
    pub to: usize,
}

impl Reorder {
    /// Check if the item was dropped where it started.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Binds an observable list to the nodes of a [`SortableHost`].
///
/// The list is held through a [`Reorderable`] handle: drops move items but
/// never add or remove them.
pub struct SortableList<T, N> {
    items: Reorderable<T>,
    tags: HashMap<N, T>,
    snapshot: Option<Vec<N>>,
}

impl<T, N> SortableList<T, N>
where
    T: Clone + PartialEq + 'static,
    N: Clone + Eq + Hash,
{
    /// Synchronize `items`. The handle shares the list with its other owners.
    pub fn new(items: ObservableList<T>) -> Self {
        Self::over(Reorderable::from(items))
    }

    /// Synchronize the list behind a reorder-only handle.
    pub fn over(items: Reorderable<T>) -> Self {
        Self {
            items,
            tags: HashMap::new(),
            snapshot: None,
        }
    }

    pub fn items(&self) -> &Reorderable<T> {
        &self.items
    }

    /// Tag a rendered node with the item it shows.
    pub fn tag_item(&mut self, node: N, item: T) {
        self.tags.insert(node, item);
    }

    /// Forget the item of `node`, e.g. when the node is no longer rendered.
    pub fn untag(&mut self, node: &N) -> Option<T> {
        self.tags.remove(node)
    }

    /// The item a node was tagged with.
    pub fn item_for(&self, node: &N) -> Option<&T> {
        self.tags.get(node)
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    pub fn is_dragging(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Remember the host's children before the widget starts moving them.
    pub fn begin_drag<H>(&mut self, host: &H)
    where
        H: SortableHost<Node = N>,
    {
        self.snapshot = Some(host.child_nodes());
    }

    /// Abandon a drag, restoring the host's children if a drag was started.
    pub fn cancel_drag<H>(&mut self, host: &mut H)
    where
        H: SortableHost<Node = N>,
    {
        if let Some(snapshot) = self.snapshot.take() {
            host.set_child_nodes(snapshot);
        }
    }

    /// Translate the drop of `moved` into a move on the list.
    ///
    /// The host's children are restored from the snapshot taken by
    /// [`begin_drag`](Self::begin_drag) whether or not the drop is accepted.
    /// A drop without a preceding `begin_drag` leaves the host as it is.
    pub fn drop_item<H>(&mut self, host: &mut H, moved: &N) -> Result<Reorder, SortError>
    where
        H: SortableHost<Node = N>,
    {
        let resolved = self.resolve(host, moved);
        if let Some(snapshot) = self.snapshot.take() {
            host.set_child_nodes(snapshot);
        }

        match resolved {
            Ok(reorder) => {
                self.items.move_item(reorder.from, reorder.to);
                tracing::debug!(from = reorder.from, to = reorder.to, "item reordered");
                Ok(reorder)
            }
            Err(err) => {
                tracing::warn!(%err, "drop rejected");
                Err(err)
            }
        }
    }

    fn resolve<H>(&self, host: &H, moved: &N) -> Result<Reorder, SortError>
    where
        H: SortableHost<Node = N>,
    {
        let item = self.tags.get(moved).ok_or(SortError::UntaggedNode)?;
        let from = self
            .items
            .position(|candidate| candidate == item)
            .ok_or(SortError::ItemNotFound)?;
        let to = host
            .element_position(moved)
            .ok_or(SortError::NodeDetached)?;
        let len = self.items.len();
        if to >= len {
            return Err(SortError::OutOfRange { index: to, len });
        }
        Ok(Reorder { from, to })
    }
}

impl<T, N> std::fmt::Debug for SortableList<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortableList")
            .field("tags", &self.tags.len())
            .field("dragging", &self.snapshot.is_some())
            .finish_non_exhaustive()
    }
}
