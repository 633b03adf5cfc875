//! Arena-backed binary Merkle tree.
//!
//! [`MerkleTree`] owns every node in a single `Vec`. Links between nodes, up
//! and down, are [`NodeId`] indices into that arena. Leaves occupy the first
//! slots in input order; each level of parents is appended after the level
//! below it, so the root is always the last node.
//!
//! # Invariants
//!
//! - Every internal node has both children. The last node of an odd level is
//!   its parent's left *and* right child.
//! - A parent's digest is `hash(min(left, right), max(left, right))`.
//! - The root is the only node without a parent, and every leaf reaches it in
//!   exactly [`MerkleTree::depth`] steps.

use tracing::debug;

use crate::error::{MerkleError, MerkleResult};
use crate::hasher::HashPrimitive;
use crate::proof::MerkleProof;

/// Index of a node inside its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of a [`MerkleTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<D> {
    hash: D,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<D> Node<D> {
    fn leaf(hash: D) -> Self {
        Self {
            hash,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The node's digest.
    pub fn hash(&self) -> &D {
        &self.hash
    }

    /// The node this one was paired under, if it is not a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Left child. Absent for leaves.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child. Absent for leaves; equal to the left child when the node
    /// was self-paired.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Hash every entry into a standalone leaf node, preserving input order.
///
/// Fails on the first entry the hasher rejects; no partial list is returned.
pub fn build_leaves<H, I>(hasher: &H, entries: I) -> MerkleResult<Vec<Node<H::Digest>>>
where
    H: HashPrimitive + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    entries
        .into_iter()
        .map(|entry| -> MerkleResult<Node<H::Digest>> {
            Ok(Node::leaf(hasher.hash_entry(entry.as_ref())?))
        })
        .collect()
}

/// Build a tree over `entries` and return only its root digest.
pub fn compute_root<H, I>(hasher: &H, entries: I) -> MerkleResult<H::Digest>
where
    H: HashPrimitive + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let tree = MerkleTree::build(hasher, entries)?;
    Ok(tree.root_hash().clone())
}

/// Binary Merkle tree over an ordered list of entries.
///
/// Immutable once built. A completed tree can be shared across threads for
/// proof lookups whenever its digest type can.
#[derive(Clone, Debug)]
pub struct MerkleTree<D> {
    /// Every node, leaves first, root last.
    nodes: Vec<Node<D>>,
    /// Leaf ids in input order.
    leaves: Vec<NodeId>,
    root: NodeId,
    /// Number of parent levels above the leaves.
    depth: usize,
}

impl<D: Clone + Ord + AsRef<[u8]>> MerkleTree<D> {
    /// Hash `entries` into leaves and build the tree over them.
    pub fn build<H, I>(hasher: &H, entries: I) -> MerkleResult<Self>
    where
        H: HashPrimitive<Digest = D> + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let leaves = build_leaves(hasher, entries)?;
        Self::from_leaves(hasher, leaves)
    }

    /// Pair `leaves` level by level until a single root remains.
    ///
    /// Only the leaves' digests are used; any links they carry are dropped.
    pub fn from_leaves<H>(hasher: &H, leaves: Vec<Node<D>>) -> MerkleResult<Self>
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let leaf_count = leaves.len();
        let mut nodes: Vec<Node<D>> = Vec::with_capacity(2 * leaf_count);
        nodes.extend(leaves.into_iter().map(|node| Node::leaf(node.hash)));

        let leaf_ids: Vec<NodeId> = (0..leaf_count).map(NodeId).collect();
        let mut level = leaf_ids.clone();
        let mut depth = 0;

        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            for pair in level.chunks(2) {
                let left = pair[0];
                // Odd node: pair with itself
                let right = pair.get(1).copied().unwrap_or(left);
                let hash = hasher.hash_sorted_pair(&nodes[left.0].hash, &nodes[right.0].hash)?;

                let parent = NodeId(nodes.len());
                nodes.push(Node {
                    hash,
                    parent: None,
                    left: Some(left),
                    right: Some(right),
                });
                nodes[left.0].parent = Some(parent);
                nodes[right.0].parent = Some(parent);
                next.push(parent);
            }
            depth += 1;
            debug!(
                level = depth,
                width = next.len(),
                self_paired = level.len() % 2 == 1,
                "built merkle level"
            );
            level = next;
        }

        let root = level[0];
        debug!(leaves = leaf_count, depth, nodes = nodes.len(), "merkle tree complete");
        Ok(Self {
            nodes,
            leaves: leaf_ids,
            root,
            depth,
        })
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root digest, which commits to every entry and their order.
    pub fn root_hash(&self) -> &D {
        &self.nodes[self.root.0].hash
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Distance from any leaf to the root. Zero for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf ids in input order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Leaf digests in input order.
    pub fn leaf_hashes(&self) -> impl Iterator<Item = &D> + '_ {
        self.leaves.iter().map(move |id| &self.nodes[id.0].hash)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(id.0)
    }

    /// First leaf, in input order, whose digest equals `hash`.
    pub fn find_leaf(&self, hash: &D) -> Option<NodeId> {
        self.leaves
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].hash == *hash)
    }

    /// Returns `true` if some leaf carries the digest of `entry`.
    pub fn contains<H>(&self, hasher: &H, entry: &[u8]) -> MerkleResult<bool>
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        let target = hasher.hash_entry(entry)?;
        Ok(self.find_leaf(&target).is_some())
    }

    /// Sibling digests from the leaf holding `entry` up to the root.
    ///
    /// The first element is the leaf's own sibling and the last is the root's
    /// child on the other side. A self-paired node contributes its own digest.
    pub fn find_path<H>(&self, hasher: &H, entry: &[u8]) -> MerkleResult<Vec<D>>
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        let target = hasher.hash_entry(entry)?;
        let leaf = self
            .find_leaf(&target)
            .ok_or_else(|| MerkleError::entry_not_found(entry))?;
        let path = self.path_from(leaf);
        debug!(leaf = leaf.0, len = path.len(), "generated merkle path");
        Ok(path)
    }

    /// Like [`find_path`](Self::find_path), bundled with the leaf and root
    /// digests so it can be checked on its own.
    pub fn proof<H>(&self, hasher: &H, entry: &[u8]) -> MerkleResult<MerkleProof<D>>
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        let leaf = hasher.hash_entry(entry)?;
        let path = self.find_path(hasher, entry)?;
        Ok(MerkleProof {
            leaf,
            path,
            root: self.root_hash().clone(),
        })
    }

    /// Walk parent links from `node` to the root, collecting siblings.
    pub(crate) fn path_from(&self, node: NodeId) -> Vec<D> {
        let mut path = Vec::with_capacity(self.depth);
        let mut current = node;
        while let Some(parent_id) = self.nodes[current.0].parent {
            let parent = &self.nodes[parent_id.0];
            let sibling = if parent.left == Some(current) {
                parent.right
            } else {
                parent.left
            };
            if let Some(sibling) = sibling {
                path.push(self.nodes[sibling.0].hash.clone());
            }
            current = parent_id;
        }
        path
    }
}
