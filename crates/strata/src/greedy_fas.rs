//! Weighted Eades–Lin–Smyth greedy feedback arc set.
//!
//! Parallel edges are condensed into a simple graph with summed weights.
//! Nodes live in buckets keyed by out-weight minus in-weight; sinks and
//! sources are drained eagerly, and when neither exists the node with the
//! largest difference is sacrificed, its remaining in-edges joining the
//! feedback set.

use crate::LayoutGraph;
use rustc_hash::FxHashMap;
use strata_graph::EdgeId;

const NIL: usize = usize::MAX;

/// Bucket membership as an arena of index-linked list nodes. Every node sits
/// in exactly one bucket at a time; unlinking and relinking are O(1) and
/// allocation-free.
struct BucketRing {
    prev: Vec<usize>,
    next: Vec<usize>,
    head: Vec<usize>,
    bucket_of: Vec<usize>,
}

impl BucketRing {
    fn new(nodes: usize, buckets: usize) -> Self {
        Self {
            prev: vec![NIL; nodes],
            next: vec![NIL; nodes],
            head: vec![NIL; buckets],
            bucket_of: vec![NIL; nodes],
        }
    }

    fn unlink(&mut self, v: usize) {
        let bucket = self.bucket_of[v];
        if bucket == NIL {
            return;
        }
        let (p, n) = (self.prev[v], self.next[v]);
        if p != NIL {
            self.next[p] = n;
        } else {
            self.head[bucket] = n;
        }
        if n != NIL {
            self.prev[n] = p;
        }
        self.prev[v] = NIL;
        self.next[v] = NIL;
        self.bucket_of[v] = NIL;
    }

    fn push_front(&mut self, bucket: usize, v: usize) {
        self.unlink(v);
        let h = self.head[bucket];
        self.next[v] = h;
        if h != NIL {
            self.prev[h] = v;
        }
        self.head[bucket] = v;
        self.bucket_of[v] = bucket;
    }

    fn pop_front(&mut self, bucket: usize) -> Option<usize> {
        let h = self.head[bucket];
        if h == NIL {
            return None;
        }
        self.unlink(h);
        Some(h)
    }
}

struct State {
    ring: BucketRing,
    in_w: Vec<i64>,
    out_w: Vec<i64>,
    ins: Vec<Vec<(usize, i64)>>,
    outs: Vec<Vec<(usize, i64)>>,
    alive: Vec<bool>,
    remaining: usize,
    zero_idx: i64,
    last_bucket: usize,
}

impl State {
    fn assign_bucket(&mut self, v: usize) {
        let idx = if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            self.last_bucket
        } else {
            let raw = self.out_w[v] - self.in_w[v] + self.zero_idx;
            raw.clamp(1, (self.last_bucket - 1) as i64) as usize
        };
        self.ring.push_front(idx, v);
    }

    fn remove(&mut self, v: usize, feedback: Option<&mut Vec<(usize, usize)>>) {
        self.ring.unlink(v);
        self.alive[v] = false;
        self.remaining -= 1;

        if let Some(feedback) = feedback {
            for &(u, _) in &self.ins[v] {
                if self.alive[u] {
                    feedback.push((u, v));
                }
            }
        }

        let ins = std::mem::take(&mut self.ins[v]);
        for &(u, w) in &ins {
            if self.alive[u] {
                self.out_w[u] -= w;
                self.assign_bucket(u);
            }
        }
        self.ins[v] = ins;

        let outs = std::mem::take(&mut self.outs[v]);
        for &(u, w) in &outs {
            if self.alive[u] {
                self.in_w[u] -= w;
                self.assign_bucket(u);
            }
        }
        self.outs[v] = outs;
    }
}

pub fn greedy_fas(g: &LayoutGraph) -> Vec<EdgeId> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids = g.node_ids();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for (i, v) in ids.iter().enumerate() {
        index.insert(v.clone(), i);
    }

    // Condense parallel edges; self loops go straight into the result since
    // removing them cannot influence the ordering.
    let mut out: Vec<EdgeId> = Vec::new();
    let mut pair_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut pairs: Vec<(usize, usize, i64)> = Vec::new();
    for e in g.edge_ids() {
        let weight = g
            .edge_by_id(&e)
            .map(|l| {
                if l.weight.is_finite() {
                    l.weight.round() as i64
                } else {
                    0
                }
            })
            .unwrap_or(1);
        let (Some(&tail), Some(&head)) = (index.get(&e.tail), index.get(&e.head)) else {
            continue;
        };
        if tail == head {
            out.push(e);
            continue;
        }
        match pair_index.get(&(tail, head)) {
            Some(&i) => pairs[i].2 += weight,
            None => {
                pair_index.insert((tail, head), pairs.len());
                pairs.push((tail, head, weight));
            }
        }
    }

    let n = ids.len();
    let mut in_w: Vec<i64> = vec![0; n];
    let mut out_w: Vec<i64> = vec![0; n];
    let mut ins: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    let mut outs: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    let mut max_in: i64 = 0;
    let mut max_out: i64 = 0;
    for &(tail, head, w) in &pairs {
        out_w[tail] += w;
        in_w[head] += w;
        max_out = max_out.max(out_w[tail]);
        max_in = max_in.max(in_w[head]);
        outs[tail].push((head, w));
        ins[head].push((tail, w));
    }

    let bucket_count = (max_out + max_in + 3).max(3) as usize;
    let mut state = State {
        ring: BucketRing::new(n, bucket_count),
        in_w,
        out_w,
        ins,
        outs,
        alive: vec![true; n],
        remaining: n,
        zero_idx: max_in + 1,
        last_bucket: bucket_count - 1,
    };
    for v in 0..n {
        state.assign_bucket(v);
    }

    let mut feedback: Vec<(usize, usize)> = Vec::new();
    while state.remaining > 0 {
        while let Some(v) = state.ring.pop_front(0) {
            state.remove(v, None);
        }
        while let Some(v) = state.ring.pop_front(state.last_bucket) {
            state.remove(v, None);
        }
        if state.remaining == 0 {
            break;
        }

        let mut picked: Option<usize> = None;
        for bucket in (1..state.last_bucket).rev() {
            if let Some(v) = state.ring.pop_front(bucket) {
                picked = Some(v);
                break;
            }
        }
        if let Some(v) = picked {
            state.remove(v, Some(&mut feedback));
        }
        // No pick means every live node drifted into an extreme bucket; the
        // next drain round handles them.
    }

    // Expand condensed pairs back into the concrete (possibly parallel)
    // edges of the original graph.
    for (tail, head) in feedback {
        out.extend(g.out_edges(&ids[tail], Some(&ids[head])));
    }
    out
}
