//! Reviewer selection policy.
//!
//! Pure functions over in-memory candidate lists. The random source is
//! supplied by the caller on every call.

use metadata::users::UserSummary;
use rand::Rng;

use crate::error::AssignmentError;

pub const MAX_INITIAL_REVIEWERS: usize = 2;

fn candidates<'a>(members: &'a [UserSummary], excluded: &[&str]) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::with_capacity(members.len());
    for member in members {
        let id = member.id.as_str();
        if excluded.contains(&id) || out.contains(&id) {
            continue;
        }
        out.push(id);
    }

    out
}

/// Picks up to [`MAX_INITIAL_REVIEWERS`] distinct members other than the
/// author. When there are no more candidates than that, all of them are
/// returned in input order.
pub fn select_initial_reviewers<R: Rng + ?Sized>(
    author_id: &str,
    members: &[UserSummary],
    rng: &mut R,
) -> Vec<String> {
    let mut pool = candidates(members, &[author_id]);
    if pool.len() <= MAX_INITIAL_REVIEWERS {
        return pool.into_iter().map(str::to_string).collect();
    }

    let mut selected = Vec::with_capacity(MAX_INITIAL_REVIEWERS);
    while selected.len() < MAX_INITIAL_REVIEWERS {
        let idx = rng.gen_range(0..pool.len());
        selected.push(pool.remove(idx).to_string());
    }

    selected
}

/// Draws one member to take over from `outgoing_id`. The author, the outgoing
/// reviewer and the reviewers already on the list are never returned.
pub fn select_replacement_reviewer<R: Rng + ?Sized>(
    author_id: &str,
    outgoing_id: &str,
    current_reviewers: &[String],
    members: &[UserSummary],
    rng: &mut R,
) -> Result<String, AssignmentError> {
    let mut excluded = vec![author_id, outgoing_id];
    excluded.extend(current_reviewers.iter().map(String::as_str));

    let pool = candidates(members, &excluded);
    if pool.is_empty() {
        return Err(AssignmentError::NoCandidateAvailable(format!(
            "no active replacement for reviewer {outgoing_id}"
        )));
    }

    Ok(pool[rng.gen_range(0..pool.len())].to_string())
}

/// Swaps `outgoing_id` for `new_id` in place, keeping every other position.
pub fn replace_reviewer(reviewers: &[String], outgoing_id: &str, new_id: &str) -> Vec<String> {
    reviewers
        .iter()
        .map(|id| {
            if id == outgoing_id {
                new_id.to_string()
            } else {
                id.clone()
            }
        })
        .collect()
}
