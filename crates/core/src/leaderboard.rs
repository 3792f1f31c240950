//! Enrollment leaderboard ranking.
//!
//! Sites are ranked by enrolled subjects. Ties share a rank and the next
//! rank skips ahead (standard competition ranking: 1, 1, 3). Tie order
//! within a rank is progress toward target, then name, then id, so the
//! output is deterministic across storage backends.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// One site's enrollment count as fed into [`rank_sites`].
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTally {
    pub hospital_id: DbId,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub enrolled: i64,
    pub target: Option<i32>,
}

/// A ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub hospital_id: DbId,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub enrolled: i64,
    pub target: Option<i32>,
    /// `None` when the site has no (or a zero) target.
    pub percent_of_target: Option<f64>,
}

/// Ranked entries plus totals across every site (not only the listed ones).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub site_count: usize,
    pub total_enrolled: i64,
    pub total_target: i64,
    pub overall_percent: Option<f64>,
}

/// Progress toward target as a percentage rounded to one decimal.
pub fn percent_of_target(enrolled: i64, target: Option<i32>) -> Option<f64> {
    match target {
        Some(t) if t > 0 => Some(round1(enrolled as f64 * 100.0 / f64::from(t))),
        _ => None,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Order two entries for display: most enrolled first.
fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.enrolled
        .cmp(&a.enrolled)
        .then_with(|| match (a.percent_of_target, b.percent_of_target) {
            (Some(pa), Some(pb)) => pb.total_cmp(&pa),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.hospital_id.cmp(&b.hospital_id))
}

/// Rank sites and compute totals.
///
/// `limit` truncates the returned entries only; totals always cover every
/// site passed in.
pub fn rank_sites(sites: Vec<SiteTally>, limit: Option<usize>) -> Leaderboard {
    let site_count = sites.len();
    let total_enrolled: i64 = sites.iter().map(|s| s.enrolled).sum();
    let total_target: i64 = sites
        .iter()
        .filter_map(|s| s.target)
        .map(i64::from)
        .sum();

    let mut entries: Vec<LeaderboardEntry> = sites
        .into_iter()
        .map(|s| LeaderboardEntry {
            rank: 0,
            percent_of_target: percent_of_target(s.enrolled, s.target),
            hospital_id: s.hospital_id,
            name: s.name,
            city: s.city,
            country: s.country,
            enrolled: s.enrolled,
            target: s.target,
        })
        .collect();

    entries.sort_by(compare_entries);

    let mut previous: Option<(i64, u32)> = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        let rank = match previous {
            Some((enrolled, rank)) if enrolled == entry.enrolled => rank,
            _ => index as u32 + 1,
        };
        entry.rank = rank;
        previous = Some((entry.enrolled, rank));
    }

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    let overall_percent = if total_target > 0 {
        Some(round1(total_enrolled as f64 * 100.0 / total_target as f64))
    } else {
        None
    };

    Leaderboard {
        entries,
        site_count,
        total_enrolled,
        total_target,
        overall_percent,
    }
}

/// Count enrollment records per hospital, keeping those at or after `since`.
pub fn tally_since<I>(records: I, since: Option<Timestamp>) -> HashMap<DbId, i64>
where
    I: IntoIterator<Item = (DbId, Timestamp)>,
{
    let mut counts = HashMap::new();
    for (hospital_id, enrolled_at) in records {
        if since.is_some_and(|cutoff| enrolled_at < cutoff) {
            continue;
        }
        *counts.entry(hospital_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn site(id: DbId, name: &str, enrolled: i64, target: Option<i32>) -> SiteTally {
        SiteTally {
            hospital_id: id,
            name: name.to_string(),
            city: None,
            country: None,
            enrolled,
            target,
        }
    }

    fn ranks(board: &Leaderboard) -> Vec<(DbId, u32)> {
        board.entries.iter().map(|e| (e.hospital_id, e.rank)).collect()
    }

    #[test]
    fn orders_by_enrolled_descending() {
        let board = rank_sites(
            vec![
                site(1, "Alpha", 3, None),
                site(2, "Bravo", 9, None),
                site(3, "Charlie", 5, None),
            ],
            None,
        );
        assert_eq!(ranks(&board), vec![(2, 1), (3, 2), (1, 3)]);
    }

    #[test]
    fn ties_share_rank_and_skip() {
        let board = rank_sites(
            vec![
                site(1, "Alpha", 4, None),
                site(2, "Bravo", 4, None),
                site(3, "Charlie", 1, None),
            ],
            None,
        );
        assert_eq!(ranks(&board), vec![(1, 1), (2, 1), (3, 3)]);
    }

    #[test]
    fn tie_broken_by_progress_then_name() {
        let board = rank_sites(
            vec![
                site(1, "zulu", 5, Some(50)),
                site(2, "Yankee", 5, Some(10)),
                site(3, "alpha", 5, None),
                site(4, "Bravo", 5, None),
            ],
            None,
        );
        let order: Vec<DbId> = board.entries.iter().map(|e| e.hospital_id).collect();
        assert_eq!(order, vec![2, 1, 3, 4]);
        assert!(board.entries.iter().all(|e| e.rank == 1));
    }

    #[test]
    fn totals_ignore_limit() {
        let board = rank_sites(
            vec![
                site(1, "Alpha", 10, Some(20)),
                site(2, "Bravo", 5, Some(20)),
                site(3, "Charlie", 1, None),
            ],
            Some(1),
        );
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.site_count, 3);
        assert_eq!(board.total_enrolled, 16);
        assert_eq!(board.total_target, 40);
        assert_eq!(board.overall_percent, Some(40.0));
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(percent_of_target(1, Some(3)), Some(33.3));
        assert_eq!(percent_of_target(2, Some(3)), Some(66.7));
        assert_eq!(percent_of_target(5, Some(0)), None);
        assert_eq!(percent_of_target(5, None), None);
    }

    #[test]
    fn empty_board() {
        let board = rank_sites(Vec::new(), Some(10));
        assert!(board.entries.is_empty());
        assert_eq!(board.total_enrolled, 0);
        assert_eq!(board.overall_percent, None);
    }

    #[test]
    fn tally_respects_cutoff() {
        let now = Utc::now();
        let records = vec![
            (1, now - Duration::days(10)),
            (1, now - Duration::days(1)),
            (2, now),
        ];

        let all = tally_since(records.clone(), None);
        assert_eq!(all.get(&1), Some(&2));
        assert_eq!(all.get(&2), Some(&1));

        let recent = tally_since(records, Some(now - Duration::days(2)));
        assert_eq!(recent.get(&1), Some(&1));
        assert_eq!(recent.get(&2), Some(&1));
    }
}
