//! Small traversal helpers shared by the layout engine and its tests.

use crate::Graph;
use rustc_hash::{FxHashMap, FxHashSet};

fn traversal_next<N, E, G>(g: &Graph<N, E, G>, v: &str) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.is_directed() {
        g.successors(v)
    } else {
        g.neighbors(v)
    }
}

/// Depth-first postorder over the given roots. Each reachable node appears
/// exactly once, after all of its traversal descendants.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[String]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut out: Vec<String> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();

    for root in roots {
        if visited.contains(root) || !g.has_node(root) {
            continue;
        }
        visited.insert(root.clone());

        let mut stack: Vec<(String, Vec<String>, usize)> =
            vec![(root.clone(), traversal_next(g, root), 0)];
        while let Some((v, next, idx)) = stack.last_mut() {
            if let Some(w) = next.get(*idx).cloned() {
                *idx += 1;
                if visited.insert(w.clone()) {
                    let children = traversal_next(g, &w);
                    stack.push((w, children, 0));
                }
                continue;
            }
            out.push(v.clone());
            stack.pop();
        }
    }

    out
}

/// Weakly connected components, each listed in node insertion order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut out: Vec<Vec<String>> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();

    for v in g.node_ids() {
        if visited.contains(&v) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut stack: Vec<String> = vec![v.clone()];
        visited.insert(v);
        while let Some(u) = stack.pop() {
            component.push(u.clone());
            for w in g.successors(&u).into_iter().chain(g.predecessors(&u)) {
                if visited.insert(w.clone()) {
                    stack.push(w);
                }
            }
        }
        out.push(component);
    }

    out
}

/// Strongly connected components that contain a cycle: components of size
/// two or more, plus single nodes with a self edge.
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    tarjan(g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || (scc.len() == 1 && g.has_edge(&scc[0], &scc[0], None)))
        .collect()
}

struct TarjanState {
    index: usize,
    indices: FxHashMap<String, usize>,
    lowlink: FxHashMap<String, usize>,
    on_stack: FxHashSet<String>,
    stack: Vec<String>,
    sccs: Vec<Vec<String>>,
}

fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut state = TarjanState {
        index: 0,
        indices: FxHashMap::default(),
        lowlink: FxHashMap::default(),
        on_stack: FxHashSet::default(),
        stack: Vec::new(),
        sccs: Vec::new(),
    };

    for v in g.node_ids() {
        if !state.indices.contains_key(&v) {
            strong_connect(g, &v, &mut state);
        }
    }

    state.sccs
}

fn strong_connect<N, E, G>(g: &Graph<N, E, G>, v: &str, state: &mut TarjanState)
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    state.indices.insert(v.to_string(), state.index);
    state.lowlink.insert(v.to_string(), state.index);
    state.index += 1;
    state.stack.push(v.to_string());
    state.on_stack.insert(v.to_string());

    for w in g.successors(v) {
        if !state.indices.contains_key(&w) {
            strong_connect(g, &w, state);
            let w_low = state.lowlink[&w];
            let v_low = state.lowlink[v].min(w_low);
            state.lowlink.insert(v.to_string(), v_low);
        } else if state.on_stack.contains(&w) {
            let w_index = state.indices[&w];
            let v_low = state.lowlink[v].min(w_index);
            state.lowlink.insert(v.to_string(), v_low);
        }
    }

    if state.lowlink[v] == state.indices[v] {
        let mut scc: Vec<String> = Vec::new();
        while let Some(w) = state.stack.pop() {
            state.on_stack.remove(&w);
            let done = w == v;
            scc.push(w);
            if done {
                break;
            }
        }
        state.sccs.push(scc);
    }
}
