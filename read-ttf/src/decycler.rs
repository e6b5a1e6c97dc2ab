//! Detection of cycles in recursive structures.

use std::ops::{Deref, DerefMut};

/// Tracks the path of a depth first traversal, failing when a cycle is
/// found or a maximum depth is exceeded.
///
/// Cycle detection uses the tortoise and hare scheme: each newly entered
/// node is compared against the node halfway up the current path. A cycle
/// of any period that fits within `MAX_DEPTH` is caught after a bounded
/// number of steps, and the depth limit backstops everything else.
pub(crate) struct Decycler<T, const MAX_DEPTH: usize> {
    node_ids: [T; MAX_DEPTH],
    depth: usize,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum DecyclerError {
    CycleDetected,
    DepthLimitExceeded,
}

impl<T, const MAX_DEPTH: usize> Decycler<T, MAX_DEPTH>
where
    T: Copy + Default + PartialEq,
{
    pub fn new() -> Self {
        Self {
            node_ids: [T::default(); MAX_DEPTH],
            depth: 0,
        }
    }

    /// Record entry into the node with the given id, returning a guard
    /// that unwinds the path entry when dropped.
    pub fn enter(&mut self, node_id: T) -> Result<DecyclerGuard<'_, T, MAX_DEPTH>, DecyclerError> {
        if self.depth >= MAX_DEPTH {
            return Err(DecyclerError::DepthLimitExceeded);
        }
        if self.depth > 0 && self.node_ids[self.depth / 2] == node_id {
            return Err(DecyclerError::CycleDetected);
        }
        self.node_ids[self.depth] = node_id;
        self.depth += 1;
        Ok(DecyclerGuard { decycler: self })
    }
}

/// Derefs to the underlying [`Decycler`] so that recursive calls can
/// enter child nodes; decrements the path depth on drop.
pub(crate) struct DecyclerGuard<'a, T, const MAX_DEPTH: usize> {
    decycler: &'a mut Decycler<T, MAX_DEPTH>,
}

impl<T, const MAX_DEPTH: usize> Deref for DecyclerGuard<'_, T, MAX_DEPTH> {
    type Target = Decycler<T, MAX_DEPTH>;

    fn deref(&self) -> &Self::Target {
        self.decycler
    }
}

impl<T, const MAX_DEPTH: usize> DerefMut for DecyclerGuard<'_, T, MAX_DEPTH> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.decycler
    }
}

impl<T, const MAX_DEPTH: usize> Drop for DecyclerGuard<'_, T, MAX_DEPTH> {
    fn drop(&mut self) {
        self.decycler.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Children of each node, keyed by node id.
    fn visit(
        edges: &[(u16, &[u16])],
        node: u16,
        decycler: &mut Decycler<u16, 8>,
    ) -> Result<usize, DecyclerError> {
        let mut guard = decycler.enter(node)?;
        let mut count = 1;
        let children = edges
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, children)| *children)
            .unwrap_or_default();
        for child in children {
            count += visit(edges, *child, &mut guard)?;
        }
        Ok(count)
    }

    #[test]
    fn acyclic_traversal() {
        // diamond: both paths reach 3, which is fine because the
        // revisit is not on the same path
        let edges: &[(u16, &[u16])] = &[(0, &[1, 2]), (1, &[3]), (2, &[3])];
        let mut decycler = Decycler::new();
        assert_eq!(visit(edges, 0, &mut decycler), Ok(5));
    }

    #[test]
    fn direct_cycle() {
        let edges: &[(u16, &[u16])] = &[(0, &[1]), (1, &[0])];
        let mut decycler = Decycler::new();
        assert_eq!(
            visit(edges, 0, &mut decycler),
            Err(DecyclerError::CycleDetected)
        );
    }

    #[test]
    fn self_cycle() {
        let edges: &[(u16, &[u16])] = &[(0, &[1]), (1, &[1])];
        let mut decycler = Decycler::new();
        assert_eq!(
            visit(edges, 0, &mut decycler),
            Err(DecyclerError::CycleDetected)
        );
    }

    #[test]
    fn depth_limit() {
        let edges: &[(u16, &[u16])] = &[
            (0, &[1]),
            (1, &[2]),
            (2, &[3]),
            (3, &[4]),
            (4, &[5]),
            (5, &[6]),
            (6, &[7]),
            (7, &[8]),
        ];
        let mut decycler = Decycler::new();
        assert_eq!(
            visit(edges, 0, &mut decycler),
            Err(DecyclerError::DepthLimitExceeded)
        );
    }
}
