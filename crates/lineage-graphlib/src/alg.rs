//! Traversal helpers over [`Graph`].

use crate::graph::{EdgeKey, Graph};

/// Finds the edges that close a cycle.
///
/// The walk is a depth-first search that keeps the current branch on a stack; an edge pointing
/// back into that stack closes a cycle and is reported instead of followed. `roots` are walked
/// first, then every remaining node in insertion order, so the reported set depends only on
/// the input order. Only edges accepted by `follow` are considered. Self-loops are reported.
pub fn back_edges<N, E, F>(g: &Graph<N, E>, roots: &[usize], follow: F) -> Vec<EdgeKey>
where
    F: Fn(&E) -> bool,
{
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unseen,
        OnStack,
        Done,
    }

    let n = g.node_count();
    let mut mark = vec![Mark::Unseen; n];
    let mut out: Vec<EdgeKey> = Vec::new();

    let starts = roots
        .iter()
        .copied()
        .filter(|&r| r < n)
        .chain(0..n)
        .collect::<Vec<_>>();

    for start in starts {
        if mark[start] != Mark::Unseen {
            continue;
        }
        // (node, out-edges already examined)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        mark[start] = Mark::OnStack;

        while let Some(top) = stack.last_mut() {
            let (v, cursor) = *top;
            top.1 += 1;
            let next = g.out_edges(v).filter(|e| follow(e.label)).nth(cursor);
            let Some(e) = next else {
                mark[v] = Mark::Done;
                stack.pop();
                continue;
            };
            match mark[e.w] {
                Mark::OnStack => out.push(e.key.clone()),
                Mark::Unseen => {
                    mark[e.w] = Mark::OnStack;
                    stack.push((e.w, 0));
                }
                Mark::Done => {}
            }
        }
    }
    out
}
