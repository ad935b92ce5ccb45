use std::cmp::Ordering;

type StationID = u32;

/// Aggregated totals for one station. `id` and `capacity` are fixed when the
/// record is created; only `consumption` grows afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRecord {
    pub id: StationID,
    pub capacity: u64,
    pub consumption: u64,
}

#[derive(Debug)]
struct Node {
    record: StationRecord,
    height: u32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn new(id: StationID, capacity: u64) -> Box<Node> {
        Box::new(Node {
            record: StationRecord { id, capacity, consumption: 0 },
            height: 1,
            left: None,
            right: None,
        })
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) as i32 - height(&self.right) as i32
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

fn height(node: &Option<Box<Node>>) -> u32 {
    node.as_ref().map_or(0, |n| n.height)
}

/// Promotes the left child of `root`. Its right subtree moves under `root`,
/// heights of the two rotated nodes are recomputed from their children.
fn rotate_right(mut root: Box<Node>) -> Box<Node> {
    let mut pivot = root.left.take().expect("left-heavy node has a left child");
    root.left = pivot.right.take();
    root.update_height();
    pivot.right = Some(root);
    pivot.update_height();
    pivot
}

/// Mirror of [`rotate_right`].
fn rotate_left(mut root: Box<Node>) -> Box<Node> {
    let mut pivot = root.right.take().expect("right-heavy node has a right child");
    root.right = pivot.left.take();
    root.update_height();
    pivot.left = Some(root);
    pivot.update_height();
    pivot
}

/// An AVL tree of [`StationRecord`]s keyed by station id.
///
/// Built once per run by a single pass over the input rows, then walked in
/// key order for the report. Every node exclusively owns its children, so
/// the whole structure is released by an ordinary drop; the balance
/// invariant keeps the drop (and insertion) recursion depth at O(log n).
#[derive(Debug, Default)]
pub struct StationIndex {
    root: Option<Box<Node>>,
    len: usize,
}

impl StationIndex {
    pub fn new() -> Self {
        StationIndex::default()
    }

    /// Number of distinct station ids in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the record for `id`, creating it with the given capacity and
    /// zero consumption if the id was never seen before. An id that is
    /// already present keeps its original capacity unchanged.
    pub fn insert_if_absent(&mut self, id: StationID, capacity: u64) -> &StationRecord {
        let mut created = false;
        let root = self.root.take();
        self.root = Some(Self::insert_node(root, id, capacity, &mut created));
        if created {
            self.len += 1;
        }
        self.get(id).expect("record is present after insertion")
    }

    /// Standard BST search.
    pub fn get(&self, id: StationID) -> Option<&StationRecord> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match id.cmp(&node.record.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            };
        }
        None
    }

    /// Adds `amount` to the consumption of an existing record. Never creates
    /// a node; returns `false`, leaving the index untouched, when no record
    /// exists for `id`.
    pub fn accumulate(&mut self, id: StationID, amount: u64) -> bool {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match id.cmp(&node.record.id) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => {
                    node.record.consumption += amount;
                    return true;
                }
            }
        }
        false
    }

    /// Lazy in-order traversal, ascending by station id. Restartable: each
    /// call yields a fresh iterator over the full index.
    pub fn iter(&self) -> InOrderIter<'_> {
        let mut iter = InOrderIter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    fn insert_node(
        node: Option<Box<Node>>,
        id: StationID,
        capacity: u64,
        created: &mut bool,
    ) -> Box<Node> {
        let mut node = match node {
            None => {
                *created = true;
                return Node::new(id, capacity);
            }
            Some(node) => node,
        };

        match id.cmp(&node.record.id) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), id, capacity, created));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), id, capacity, created));
            }
            // Duplicate key: the existing node is kept as-is.
            Ordering::Equal => return node,
        }

        node.update_height();
        Self::rebalance(node, id)
    }

    /// Restores the AVL invariant at `node` after `id` was inserted below
    /// it. The side comparisons pick between the single- and double-rotation
    /// cases.
    fn rebalance(mut node: Box<Node>, id: StationID) -> Box<Node> {
        let balance = node.balance_factor();

        if balance > 1 {
            let left_id = node.left.as_ref().expect("left-heavy node has a left child").record.id;
            if id > left_id {
                node.left = node.left.take().map(rotate_left);
            }
            return rotate_right(node);
        }

        if balance < -1 {
            let right_id = node.right.as_ref().expect("right-heavy node has a right child").record.id;
            if id < right_id {
                node.right = node.right.take().map(rotate_right);
            }
            return rotate_left(node);
        }

        node
    }
}

pub struct InOrderIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrderIter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a StationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.record)
    }
}
