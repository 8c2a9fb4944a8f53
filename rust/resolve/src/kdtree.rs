// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3-dimensional k-d tree over connector points.
//!
//! Supports insertion and k-nearest-neighbor queries with branch pruning.
//! Nodes live in a flat `Vec` and reference children by index; there is no
//! rebalancing — connector clouds from real models are close enough to
//! uniform that sequential insertion stays near O(log n).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra::Point3;

/// One result of a k-nearest-neighbor query.
#[derive(Debug)]
pub struct NearestHit<'a, P> {
    /// Indexed point location.
    pub point: Point3<f64>,
    /// Payload stored with the point.
    pub payload: &'a P,
    /// Euclidean distance from the query point.
    pub distance: f64,
}

#[derive(Debug)]
struct Node<P> {
    point: Point3<f64>,
    payload: P,
    left: Option<usize>,
    right: Option<usize>,
}

/// A k-d tree storing 3D points with attached payloads.
#[derive(Debug)]
pub struct KdSpatialIndex<P> {
    nodes: Vec<Node<P>>,
}

impl<P> KdSpatialIndex<P> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an index with preallocated node storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a point with its payload.
    ///
    /// The caller guarantees well-formed coordinates; NaN/Inf points must be
    /// filtered out before insertion.
    pub fn insert(&mut self, point: Point3<f64>, payload: P) {
        let new_index = self.nodes.len();
        let node = Node {
            point,
            payload,
            left: None,
            right: None,
        };

        if new_index == 0 {
            self.nodes.push(node);
            return;
        }

        let mut current = 0;
        let mut axis = 0;
        loop {
            let go_left = point[axis] < self.nodes[current].point[axis];
            let child = if go_left {
                self.nodes[current].left
            } else {
                self.nodes[current].right
            };
            match child {
                Some(next) => {
                    current = next;
                    axis = (axis + 1) % 3;
                }
                None => {
                    if go_left {
                        self.nodes[current].left = Some(new_index);
                    } else {
                        self.nodes[current].right = Some(new_index);
                    }
                    self.nodes.push(node);
                    return;
                }
            }
        }
    }

    /// Up to `k` nearest points to `target`, sorted by ascending distance.
    ///
    /// Returns fewer than `k` entries when fewer points are indexed, and an
    /// empty vec for an empty index. Never fails.
    pub fn nearest(&self, target: &Point3<f64>, k: usize) -> Vec<NearestHit<'_, P>> {
        if self.nodes.is_empty() || k == 0 {
            return Vec::new();
        }

        // Max-heap of the best k candidates, keyed by squared distance.
        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
        self.search(0, 0, target, k, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|entry| {
                let node = &self.nodes[entry.node];
                NearestHit {
                    point: node.point,
                    payload: &node.payload,
                    distance: entry.dist_sq.sqrt(),
                }
            })
            .collect()
    }

    /// Nearest single point to `target`, if the index is non-empty.
    pub fn nearest_one(&self, target: &Point3<f64>) -> Option<NearestHit<'_, P>> {
        self.nearest(target, 1).into_iter().next()
    }

    fn search(
        &self,
        node_index: usize,
        axis: usize,
        target: &Point3<f64>,
        k: usize,
        heap: &mut BinaryHeap<HeapEntry>,
    ) {
        let node = &self.nodes[node_index];
        let dist_sq = (node.point - target).norm_squared();

        if heap.len() < k {
            heap.push(HeapEntry {
                dist_sq,
                node: node_index,
            });
        } else if let Some(worst) = heap.peek() {
            if dist_sq < worst.dist_sq {
                heap.pop();
                heap.push(HeapEntry {
                    dist_sq,
                    node: node_index,
                });
            }
        }

        let delta = target[axis] - node.point[axis];
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        let next_axis = (axis + 1) % 3;

        if let Some(near) = near {
            self.search(near, next_axis, target, k, heap);
        }

        // Cross the splitting plane only if it could still improve the heap
        let plane_dist_sq = delta * delta;
        let must_cross = heap.len() < k
            || heap.peek().map_or(true, |worst| plane_dist_sq < worst.dist_sq);
        if must_cross {
            if let Some(far) = far {
                self.search(far, next_axis, target, k, heap);
            }
        }
    }
}

impl<P> Default for KdSpatialIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Heap entry ordered by squared distance (max-heap).
struct HeapEntry {
    dist_sq: f64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist_sq == other.dist_sq && self.node == other.node
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then_with(|| self.node.cmp(&other.node))
    }
}
