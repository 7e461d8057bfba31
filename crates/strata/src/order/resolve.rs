//! Constraint-aware sorting of barycenter entries.
//!
//! `resolve_conflicts` coalesces entries that would violate the constraint
//! graph (or that lack a barycenter) into aggregate entries carrying the
//! weighted-average barycenter and the smallest original index. `sort` then
//! orders the sortable entries by barycenter and re-inserts the unsortable
//! ones at their original relative positions.

use super::{BarycenterEntry, ConstraintGraph};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
struct WorkEntry {
    indegree: usize,
    ins: Vec<String>,
    outs: Vec<String>,
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<SortEntry> {
    let mut mapped: FxHashMap<String, WorkEntry> = FxHashMap::default();
    for (i, entry) in entries.iter().enumerate() {
        mapped.insert(
            entry.v.clone(),
            WorkEntry {
                indegree: 0,
                ins: Vec::new(),
                outs: Vec::new(),
                vs: vec![entry.v.clone()],
                i,
                barycenter: entry.barycenter,
                weight: entry.weight,
                merged: false,
            },
        );
    }

    for e in cg.edge_ids() {
        if !mapped.contains_key(&e.tail) || !mapped.contains_key(&e.head) {
            continue;
        }
        if let Some(head) = mapped.get_mut(&e.head) {
            head.indegree += 1;
        }
        if let Some(tail) = mapped.get_mut(&e.tail) {
            tail.outs.push(e.head.clone());
        }
    }

    // Seed in entry order so the resolution is deterministic.
    let mut source_set: Vec<String> = entries
        .iter()
        .filter(|entry| mapped.get(&entry.v).is_some_and(|e| e.indegree == 0))
        .map(|entry| entry.v.clone())
        .collect();

    while let Some(v) = source_set.pop() {
        let ins = mapped.get(&v).map(|e| e.ins.clone()).unwrap_or_default();
        for u in ins.into_iter().rev() {
            if mapped.get(&u).map(|e| e.merged).unwrap_or(true) {
                continue;
            }
            let (u_bc, v_bc) = {
                let (Some(u_entry), Some(v_entry)) = (mapped.get(&u), mapped.get(&v)) else {
                    continue;
                };
                (u_entry.barycenter, v_entry.barycenter)
            };
            // A constraint edge into a later barycenter is fine; anything
            // else (including a missing barycenter) collapses into one entry.
            let violates = match (u_bc, v_bc) {
                (None, _) | (_, None) => true,
                (Some(u_bc), Some(v_bc)) => u_bc >= v_bc,
            };
            if violates {
                merge_entries(&mut mapped, &v, &u);
            }
        }

        let outs = mapped.get(&v).map(|e| e.outs.clone()).unwrap_or_default();
        for w in outs {
            let Some(w_entry) = mapped.get_mut(&w) else {
                continue;
            };
            w_entry.ins.push(v.clone());
            w_entry.indegree -= 1;
            if w_entry.indegree == 0 {
                source_set.push(w);
            }
        }
    }

    entries
        .iter()
        .filter_map(|entry| {
            let work = mapped.get(&entry.v)?;
            if work.merged {
                return None;
            }
            Some(SortEntry {
                vs: work.vs.clone(),
                i: work.i,
                barycenter: work.barycenter,
                weight: work.weight,
            })
        })
        .collect()
}

fn merge_entries(mapped: &mut FxHashMap<String, WorkEntry>, target: &str, source: &str) {
    let (source_vs, source_i, source_bc, source_w) = {
        let Some(s) = mapped.get(source) else { return };
        (s.vs.clone(), s.i, s.barycenter, s.weight)
    };

    let Some(t) = mapped.get_mut(target) else {
        return;
    };

    let mut sum = 0.0;
    let mut weight = 0.0;
    if let (Some(bc), Some(w)) = (t.barycenter, t.weight) {
        sum += bc * w;
        weight += w;
    }
    if let (Some(bc), Some(w)) = (source_bc, source_w) {
        sum += bc * w;
        weight += w;
    }

    t.vs = source_vs.into_iter().chain(t.vs.drain(..)).collect();
    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    }
    t.i = t.i.min(source_i);

    if let Some(s) = mapped.get_mut(source) {
        s.merged = true;
    }
}

pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let mut sortable: Vec<SortEntry> = Vec::new();
    let mut unsortable: Vec<SortEntry> = Vec::new();
    for entry in entries {
        if entry.barycenter.is_some() {
            sortable.push(entry.clone());
        } else {
            unsortable.push(entry.clone());
        }
    }

    // Consumed from the back, so descending index order.
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));

    sortable.sort_by(|a, b| {
        let a_bc = a.barycenter.unwrap_or(0.0);
        let b_bc = b.barycenter.unwrap_or(0.0);
        a_bc.partial_cmp(&b_bc)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| if bias_right { b.i.cmp(&a.i) } else { a.i.cmp(&b.i) })
    });

    let mut parts: Vec<Vec<String>> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index: usize = 0;

    index = consume_unsortable(&mut parts, &mut unsortable, index);
    for entry in sortable {
        index += entry.vs.len();
        parts.push(entry.vs.clone());
        if let (Some(bc), Some(w)) = (entry.barycenter, entry.weight) {
            sum += bc * w;
            weight += w;
        }
        index = consume_unsortable(&mut parts, &mut unsortable, index);
    }

    let vs: Vec<String> = parts.into_iter().flatten().collect();
    if weight != 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            barycenter: None,
            weight: None,
        }
    }
}

fn consume_unsortable(
    parts: &mut Vec<Vec<String>>,
    unsortable: &mut Vec<SortEntry>,
    mut index: usize,
) -> usize {
    while let Some(last) = unsortable.last() {
        if last.i > index {
            break;
        }
        let last = unsortable.pop().expect("checked non-empty");
        parts.push(last.vs);
        index += 1;
    }
    index
}
