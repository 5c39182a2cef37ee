use crate::resultify::{ResultifyParams, Resultifier};
use arax_core::model::TrapiResult;
use arax_core::response::Response;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Runs result extraction, copies essence scores onto the results and ranks them.
pub fn finalize(
    response: &mut Response,
    resultifier: &dyn Resultifier,
    essence_scores: &BTreeMap<String, f64>,
) {
    resultifier.apply(
        response,
        &ResultifyParams {
            ignore_edge_direction: true,
        },
    );
    if !response.is_ok() {
        return;
    }

    let mut missing = Vec::new();
    let mut unusable = Vec::new();
    for result in response.message_mut().results.iter_mut() {
        let score = essence_scores.get(&result.essence).copied();
        result.score = score.filter(|s| s.is_finite());
        match score {
            None => missing.push(result.essence.clone()),
            Some(s) if !s.is_finite() => unusable.push((result.essence.clone(), s)),
            Some(_) => {}
        }
    }
    for essence in missing {
        response.warning(format!(
            "Error retrieving score for result essence {}. Setting result score to None.",
            essence
        ));
    }
    for (essence, score) in unusable {
        response.warning(format!(
            "Score {} for result essence {} is not a finite number. Setting result score to None.",
            score, essence
        ));
    }

    // Stable sort: equal scores keep the resultifier's order.
    response.message_mut().results.sort_by(rank_descending);
}

/// Higher scores first; a missing score counts as zero and loses ties against a real zero.
fn rank_descending(a: &TrapiResult, b: &TrapiResult) -> Ordering {
    rank_key(b.score)
        .0
        .total_cmp(&rank_key(a.score).0)
        .then(rank_key(b.score).1.cmp(&rank_key(a.score).1))
}

/// `(score, present)`, with non-finite scores treated as missing and `-0.0` as `0.0`.
fn rank_key(score: Option<f64>) -> (f64, bool) {
    match score.filter(|s| s.is_finite()) {
        Some(s) => (s + 0.0, true),
        None => (0.0, false),
    }
}
