//! Parallel citation clustering.
//!
//! Groups the citations that denote one case using only extracted evidence:
//! attributed name and year, document proximity, extractor parallel groups,
//! and the reporter/volume/page fields. No network, no side effects.

use std::collections::HashMap;

use citation_types::normalize::normalize_case_name;
use citation_types::{Citation, Cluster, ProcessingConfig};

struct Proto {
    key: String,
    members: Vec<usize>,
}

/// Cluster `citations` and write each member's `cluster_id` back. Cluster ids
/// are sequential in document order of the first member, so the same input
/// always yields the same ids.
pub fn cluster_citations(citations: &mut [Citation], config: &ProcessingConfig) -> Vec<Cluster> {
    let mut protos: Vec<Proto> = Vec::new();
    let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();

    for idx in 0..citations.len() {
        let key = merge_key(&citations[idx]);
        let mut joined = None;

        if let Some(candidates) = by_key.get(&key) {
            for &p in candidates.iter().rev() {
                if can_join(&protos[p], idx, citations, config) {
                    joined = Some(p);
                    break;
                }
            }
        }

        // A nameless citation still rides along with whatever its parallel
        // group already joined, e.g. the bare P.3d member after a named
        // Wn.2d member.
        if joined.is_none() && citations[idx].extracted_case_name.is_none() {
            joined = bridge_by_group(&protos, idx, citations);
        }

        match joined {
            Some(p) => protos[p].members.push(idx),
            None => {
                by_key.entry(key.clone()).or_default().push(protos.len());
                protos.push(Proto { key, members: vec![idx] });
            }
        }
    }

    fold_no_year(&mut protos, citations, config);
    finalize(protos, citations)
}

/// Grouping key, most to least specific: name plus year, name alone, then
/// the normalized citation text itself.
fn merge_key(citation: &Citation) -> String {
    match (&citation.extracted_case_name, &citation.extracted_date) {
        (Some(name), Some(year)) => format!("{}_{}", normalize_case_name(name), year),
        (Some(name), None) => format!("{}_no_year", normalize_case_name(name)),
        (None, _) => format!("cite_{}", citation.normalized_text),
    }
}

// ============================================================================
// Merge guards
// ============================================================================

fn can_join(
    proto: &Proto,
    idx: usize,
    citations: &[Citation],
    config: &ProcessingConfig,
) -> bool {
    let candidate = &citations[idx];
    let Some(&last) = proto.members.last() else {
        return false;
    };
    let near = candidate
        .start_offset
        .saturating_sub(citations[last].end_offset)
        < config.proximity_window_chars;
    let grouped = candidate.parallel_group.is_some()
        && proto
            .members
            .iter()
            .any(|&m| citations[m].parallel_group == candidate.parallel_group);
    (near || grouped) && volume_guard_ok(&proto.members, idx, citations)
}

/// Two citations in the same reporter series with a different volume or
/// first page are different decisions, whatever the surrounding prose says.
fn volume_guard_ok(members: &[usize], idx: usize, citations: &[Citation]) -> bool {
    let candidate = &citations[idx];
    if candidate.reporter.is_none() {
        return true;
    }
    members.iter().all(|&m| {
        let member = &citations[m];
        member.reporter != candidate.reporter
            || (member.volume == candidate.volume && member.page == candidate.page)
    })
}

fn bridge_by_group(protos: &[Proto], idx: usize, citations: &[Citation]) -> Option<usize> {
    let group = citations[idx].parallel_group?;
    for (p, proto) in protos.iter().enumerate().rev() {
        let grouped = proto
            .members
            .iter()
            .any(|&m| citations[m].parallel_group == Some(group));
        if grouped && volume_guard_ok(&proto.members, idx, citations) {
            return Some(p);
        }
    }
    None
}

// ============================================================================
// Year folding
// ============================================================================

/// One missing year still merges: a `name_no_year` cluster folds into the
/// sole dated cluster for the same name, under the usual guards. Two dated
/// clusters for the name make the fold ambiguous and the undated cluster
/// stays separate.
fn fold_no_year(protos: &mut Vec<Proto>, citations: &[Citation], config: &ProcessingConfig) {
    let mut i = 0;
    while i < protos.len() {
        let Some(name) = protos[i].key.strip_suffix("_no_year") else {
            i += 1;
            continue;
        };
        let prefix = format!("{}_", name);

        let dated: Vec<usize> = protos
            .iter()
            .enumerate()
            .filter(|(j, p)| *j != i && p.key.strip_prefix(&prefix).is_some_and(is_year))
            .map(|(j, _)| j)
            .collect();

        if let [target] = dated[..] {
            let adjacent = clusters_adjacent(&protos[i], &protos[target], citations, config);
            let guarded = protos[i]
                .members
                .iter()
                .all(|&m| volume_guard_ok(&protos[target].members, m, citations));
            if adjacent && guarded {
                let moved = std::mem::take(&mut protos[i].members);
                protos[target].members.extend(moved);
                protos[target].members.sort_unstable();
                protos.remove(i);
                continue;
            }
        }
        i += 1;
    }
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_digit())
}

fn clusters_adjacent(
    a: &Proto,
    b: &Proto,
    citations: &[Citation],
    config: &ProcessingConfig,
) -> bool {
    for &m in &a.members {
        for &n in &b.members {
            if citations[m].parallel_group.is_some()
                && citations[m].parallel_group == citations[n].parallel_group
            {
                return true;
            }
            let (first, second) = if citations[m].start_offset <= citations[n].start_offset {
                (m, n)
            } else {
                (n, m)
            };
            let gap = citations[second]
                .start_offset
                .saturating_sub(citations[first].end_offset);
            if gap < config.proximity_window_chars {
                return true;
            }
        }
    }
    false
}

// ============================================================================
// Finalization
// ============================================================================

fn finalize(mut protos: Vec<Proto>, citations: &mut [Citation]) -> Vec<Cluster> {
    for proto in &mut protos {
        proto.members.sort_unstable();
    }
    protos.sort_by_key(|p| citations[p.members[0]].start_offset);

    protos
        .into_iter()
        .enumerate()
        .map(|(n, proto)| {
            let id = n as u32;
            for &m in &proto.members {
                citations[m].cluster_id = Some(id);
            }
            let representative_name = proto
                .members
                .iter()
                .find_map(|&m| citations[m].extracted_case_name.clone());
            let representative_date = proto
                .members
                .iter()
                .find_map(|&m| citations[m].extracted_date.clone());
            Cluster {
                id,
                members: proto.members,
                representative_name,
                representative_date,
                ..Default::default()
            }
        })
        .collect()
}
