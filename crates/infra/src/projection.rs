//! Pure read-side derivations over an already-fetched catalog. No I/O,
//! deterministic, tolerant of odd field contents on legacy records.

use uuid::Uuid;

use crate::models::TournamentRecord;

/// Tournaments the user holds a spot in.
pub fn history_for(user_id: Uuid, tournaments: &[TournamentRecord]) -> Vec<TournamentRecord> {
    tournaments
        .iter()
        .filter(|t| t.participants.contains(&user_id))
        .cloned()
        .collect()
}

/// Spots still open; never negative even if a record is inconsistent.
pub fn available_spots(t: &TournamentRecord) -> i32 {
    (t.spots - t.used_spots).max(0)
}

/// Case-insensitive substring match on the game title. An empty query
/// matches everything.
pub fn matches_search(t: &TournamentRecord, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    t.game_title.to_lowercase().contains(&query.to_lowercase())
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total_tournaments: i64,
    pub total_spots: i64,
    pub used_spots: i64,
    pub available_spots: i64,
    pub total_prize_pool: f64,
}

pub fn catalog_stats(tournaments: &[TournamentRecord]) -> CatalogStats {
    CatalogStats {
        total_tournaments: tournaments.len() as i64,
        total_spots: tournaments.iter().map(|t| t.spots as i64).sum(),
        used_spots: tournaments.iter().map(|t| t.used_spots as i64).sum(),
        available_spots: tournaments.iter().map(|t| available_spots(t) as i64).sum(),
        total_prize_pool: tournaments.iter().map(|t| parse_prize_pool(&t.prize_pool)).sum(),
    }
}

/// The prize pool is free-form text ("$1,000", "2500 USD", ...). Strip
/// everything that isn't part of a number and take what parses; anything
/// hopeless counts as zero.
pub fn parse_prize_pool(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn record(game_title: &str, spots: i32, used: i32, participants: Vec<Uuid>) -> TournamentRecord {
        TournamentRecord {
            id: Uuid::new_v4(),
            game_title: game_title.into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            location: "Online".into(),
            spots,
            used_spots: used,
            prize_pool: "0".into(),
            details: None,
            participants,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn history_only_contains_joined_tournaments() {
        let uid = Uuid::new_v4();
        let joined = record("Valorant Cup", 8, 1, vec![uid]);
        let other = record("CS2 Major", 8, 1, vec![Uuid::new_v4()]);

        let history = history_for(uid, &[joined.clone(), other]);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, joined.id);
    }

    #[test]
    fn history_survives_deleted_tournaments() {
        // A deleted tournament is simply gone from the catalog; the
        // projection never sees it and never errors on it.
        let uid = Uuid::new_v4();
        assert!(history_for(uid, &[]).is_empty());
    }

    #[test]
    fn available_spots_clamps_at_zero() {
        assert_eq!(available_spots(&record("x", 10, 4, vec![])), 6);
        assert_eq!(available_spots(&record("x", 10, 10, vec![])), 0);
        assert_eq!(available_spots(&record("x", 10, 12, vec![])), 0);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let t = record("Valorant Cup", 8, 0, vec![]);
        assert!(matches_search(&t, "valo"));
        assert!(matches_search(&t, "CUP"));
        assert!(matches_search(&t, ""));
        assert!(matches_search(&t, "  "));
        assert!(!matches_search(&t, "dota"));
    }

    #[test]
    fn prize_pool_parser_tolerates_currency_text() {
        assert_eq!(parse_prize_pool("$1,000"), 1000.0);
        assert_eq!(parse_prize_pool("2500.50 USD"), 2500.5);
        assert_eq!(parse_prize_pool("free entry"), 0.0);
        assert_eq!(parse_prize_pool("0"), 0.0);
    }

    #[test]
    fn stats_aggregate_the_catalog() {
        let mut a = record("A", 10, 4, vec![]);
        a.prize_pool = "$1,000".into();
        let mut b = record("B", 6, 6, vec![]);
        b.prize_pool = "500".into();

        let stats = catalog_stats(&[a, b]);
        assert_eq!(stats.total_tournaments, 2);
        assert_eq!(stats.total_spots, 16);
        assert_eq!(stats.used_spots, 10);
        assert_eq!(stats.available_spots, 6);
        assert_eq!(stats.total_prize_pool, 1500.0);
    }
}
