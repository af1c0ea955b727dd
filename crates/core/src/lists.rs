//! Movie-list rules.

/// Lists created for every newly registered account, in display order.
pub const DEFAULT_LIST_TITLES: [&str; 3] = ["Просмотренные", "Буду смотреть", "Любимые"];

/// Number of lists the registration flow creates on its own.
///
/// Used by the admin `db_check` report to estimate how many lists users
/// created by hand.
pub const DEFAULT_LISTS_PER_USER: i64 = DEFAULT_LIST_TITLES.len() as i64;

/// Remove duplicate ids while keeping the first-seen order.
pub fn dedup_movie_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
