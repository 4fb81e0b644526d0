use std::fmt::{Debug, Formatter, Result};

use geometry::bbox::{self, BBox};

/// Opaque handle of a scene object. The scene owns the object; the tree only indexes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u32);

impl ObjectRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for ObjectRef {
    fn from(i: usize) -> Self {
        assert!(i <= u32::MAX as usize, "object index {} overflows", i);
        ObjectRef(i as u32)
    }
}

/// Index of a node in the arena of its `BvhTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn from_index(i: usize) -> Self {
        assert!(i < u32::MAX as usize, "node arena overflows at {} nodes", i);
        NodeId(i as u32)
    }
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BvhNodeContent {
    /// Ordered children. A split node holds at most `BUNCHING_FACTOR` children, except for the
    /// node wrapping the infinite objects and the root it's grafted into.
    Split(Vec<NodeId>),
    Leaf(ObjectRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BvhNode {
    pub(crate) bbox: BBox,
    /// Infinite nodes are always entered at `-MAX_DISTANCE` and never pruned by their box.
    pub(crate) infinite: bool,
    pub(crate) content: BvhNodeContent,
}

impl BvhNode {
    pub fn new_leaf(bbox: BBox, object: ObjectRef, infinite: bool) -> BvhNode {
        BvhNode {
            bbox,
            infinite,
            content: BvhNodeContent::Leaf(object),
        }
    }
    pub fn bbox(&self) -> BBox {
        self.bbox
    }
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }
    pub fn content(&self) -> &BvhNodeContent {
        &self.content
    }
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BvhNodeContent::Leaf(_))
    }
    /// Returns the children of a split node, or an empty slice for a leaf.
    pub fn children(&self) -> &[NodeId] {
        match &self.content {
            BvhNodeContent::Split(children) => children,
            BvhNodeContent::Leaf(_) => &[],
        }
    }
    pub fn object(&self) -> Option<ObjectRef> {
        match self.content {
            BvhNodeContent::Split(_) => None,
            BvhNodeContent::Leaf(object) => Some(object),
        }
    }
}

/// A bounding volume hierarchy over scene objects. Built once with `build_tree()` and immutable
/// afterwards, so it can be shared by reference among any number of tracing threads.
///
/// All nodes live in one arena owned by the tree; dropping the tree releases all of them.
pub struct BvhTree {
    pub(crate) nodes: Vec<BvhNode>,
    pub(crate) root: NodeId,
}

impl BvhTree {
    pub fn root_id(&self) -> NodeId {
        self.root
    }
    pub fn root(&self) -> &BvhNode {
        self.node(self.root)
    }
    pub fn node(&self, id: NodeId) -> &BvhNode {
        &self.nodes[id.index()]
    }
    pub fn bbox(&self) -> BBox {
        self.root().bbox
    }

    /// Number of nodes reachable from the root, leaves included.
    pub fn node_count(&self) -> usize {
        self.fold_from(self.root, &|_: &BvhNode, counts: Vec<usize>| {
            1 + counts.iter().sum::<usize>()
        })
    }
    pub fn leaf_count(&self) -> usize {
        self.fold_from(self.root, &|node: &BvhNode, counts: Vec<usize>| {
            if node.is_leaf() {
                1
            } else {
                counts.iter().sum()
            }
        })
    }
    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn height(&self) -> usize {
        self.fold_from(self.root, &|_: &BvhNode, heights: Vec<usize>| {
            heights.into_iter().max().unwrap_or(0) + 1
        })
    }

    /// Returns every object indexed by the tree, in depth-first order.
    pub fn objects(&self) -> Vec<ObjectRef> {
        let mut objects = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match &node.content {
                BvhNodeContent::Leaf(object) => objects.push(*object),
                BvhNodeContent::Split(children) => stack.extend(children.iter().rev()),
            }
        }
        objects
    }

    /// Checks that every split node's box encloses its children's boxes. Panics with the
    /// offending node otherwise.
    pub fn geometric_sound(&self) -> bool {
        for node in self.nodes.iter() {
            if let BvhNodeContent::Split(children) = &node.content {
                let mut enclosing = BBox::empty();
                for child in children.iter() {
                    let child_box = self.node(*child).bbox;
                    assert!(
                        node.bbox.encloses(child_box, 1e-9),
                        "{} doesn't enclose child {}",
                        node.bbox,
                        child_box
                    );
                    enclosing = bbox::union(enclosing, child_box);
                }
                assert!(enclosing.encloses(node.bbox, 1e-9), "{} is loose", node.bbox);
            }
        }
        true
    }

    fn fold_from<T, F>(&self, id: NodeId, f: &F) -> T
    where
        F: Fn(&BvhNode, Vec<T>) -> T,
    {
        let node = self.node(id);
        let sub_results = node
            .children()
            .iter()
            .map(|child| self.fold_from(*child, f))
            .collect::<Vec<_>>();
        f(node, sub_results)
    }

    fn fmt_node(&self, id: NodeId, f: &mut Formatter<'_>, indent: usize) -> Result {
        let node = self.node(id);
        let mark = if node.infinite { " (infinite)" } else { "" };
        match &node.content {
            BvhNodeContent::Leaf(object) => writeln!(
                f,
                "{:indent$}leaf #{} {}{}",
                "",
                object.0,
                node.bbox,
                mark,
                indent = indent
            ),
            BvhNodeContent::Split(children) => {
                writeln!(f, "{:indent$}{{ bbox = {}{}", "", node.bbox, mark, indent = indent)?;
                for child in children.iter() {
                    self.fmt_node(*child, f, indent + 2)?;
                }
                writeln!(f, "{:indent$}}}", "", indent = indent)
            }
        }
    }
}

impl Debug for BvhTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_node(self.root, f, 0)
    }
}
