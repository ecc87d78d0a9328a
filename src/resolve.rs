// The matching cascade: ordered strategies from exact lookup to fuzzy
// similarity, first definite hit wins.
//
// Resolution is a pure function of the raw name and the shared index;
// failing to match is a normal outcome (`None`), never an error.

use crate::normalize::normalize;
use crate::registry::{id_precedes, Candidate, RegistryIndex};
use crate::similarity::similarity_ratio;

/// A fuzzy match must score strictly above this to be accepted.
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// Resolve a raw name against the registry index.
///
/// Strategies, attempted in order:
/// 1. exact normalized full-name lookup
/// 2. "Last, First" comma reordering, then exact lookup
/// 3. unique last-name group
/// 4. unique first-initial + last-name group
/// 5. best fuzzy candidate within the last-name group, above the threshold
pub fn resolve(raw_name: &str, index: &RegistryIndex) -> Option<String> {
    let norm = normalize(raw_name);

    if let Some(id) = index.exact_id(&norm) {
        return Some(id.to_string());
    }
    if let Some(id) = comma_reordered(raw_name, index) {
        return Some(id);
    }
    last_name_cascade(&norm, index)
}

/// Strategy 2: a "Last, First" rendering looked up against the exact index.
fn comma_reordered(raw_name: &str, index: &RegistryIndex) -> Option<String> {
    if !raw_name.contains(',') {
        return None;
    }
    let mut segments = raw_name.splitn(3, ',');
    let last = segments.next()?.trim();
    let first = segments.next()?.trim();
    let reordered = normalize(&format!("{first} {last}"));
    index.exact_id(&reordered).map(str::to_string)
}

/// Strategies 3-5: the last-name group, narrowed first by first initial and
/// then by fuzzy similarity. Skipped entirely when the last token is empty
/// or unknown to the registry.
fn last_name_cascade(norm: &str, index: &RegistryIndex) -> Option<String> {
    let last_key = norm.split_whitespace().last()?;
    let candidates = index.last_name_candidates(last_key)?;

    if candidates.len() == 1 {
        return Some(candidates[0].id.clone());
    }

    // Two or more candidates share the last name.
    if let Some(id) = unique_initial_last(norm, last_key, index) {
        return Some(id);
    }
    fuzzy_best(norm, candidates)
}

/// Strategy 4: a unique hit under the "{first-initial} {last}" key.
fn unique_initial_last(norm: &str, last_key: &str, index: &RegistryIndex) -> Option<String> {
    let initial = norm.split_whitespace().next()?.chars().next()?;
    let group = index.initial_last_candidates(&format!("{initial} {last_key}"))?;
    if group.len() == 1 {
        Some(group[0].id.clone())
    } else {
        None
    }
}

/// Strategy 5: the highest-scoring candidate by similarity ratio, accepted
/// only strictly above `FUZZY_THRESHOLD`. Ties at the maximum go to the
/// lowest identifier so the outcome never depends on registry order.
fn fuzzy_best(norm: &str, candidates: &[Candidate]) -> Option<String> {
    let mut best: Option<(&Candidate, f64)> = None;
    for candidate in candidates {
        let score = similarity_ratio(&candidate.norm_full, norm);
        let replace = match best {
            None => true,
            Some((leader, top)) => {
                score > top || (score == top && id_precedes(&candidate.id, &leader.id))
            }
        };
        if replace {
            best = Some((candidate, score));
        }
    }
    let (candidate, score) = best?;
    (score > FUZZY_THRESHOLD).then(|| candidate.id.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
