use std::cmp::Ordering;

use crate::analyzers::types::{CompanyAggregate, GroupMap, RankCriterion, Ranking};

/// Default number of companies in a ranking.
pub const DEFAULT_RANK_WIDTH: usize = 10;

/// Orders companies by total fare revenue and keeps the first `k`.
///
/// The sort is stable, so companies with equal revenue keep their
/// first-appearance order. Fewer than `k` companies yields all of them.
pub fn rank_groups(
    companies: &GroupMap<CompanyAggregate>,
    criterion: RankCriterion,
    k: usize,
) -> Ranking {
    let mut entries: Vec<(&str, f64)> = companies
        .iter()
        .map(|(name, agg)| (name.as_str(), agg.total_fare_revenue))
        .collect();

    entries.sort_by(|(_, a), (_, b)| {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match criterion {
            RankCriterion::Top => ord.reverse(),
            RankCriterion::Bottom => ord,
        }
    });

    Ranking {
        criterion,
        ordered_keys: entries
            .into_iter()
            .take(k)
            .map(|(name, _)| name.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::group_by_company;
    use crate::parser::TripRecord;

    #[test]
    fn test_top_returns_all_when_fewer_than_k() {
        let companies = group_by_company(&[
            trip("Flash Cab", "12.00"),
            trip("Sun Taxi", "40.00"),
            trip("City Service", "25.50"),
        ]);

        let ranking = rank_groups(&companies, RankCriterion::Top, 10);

        assert_eq!(ranking.criterion, RankCriterion::Top);
        assert_eq!(
            ranking.ordered_keys,
            vec!["Sun Taxi", "City Service", "Flash Cab"]
        );
    }

    #[test]
    fn test_bottom_is_ascending() {
        let companies = group_by_company(&[
            trip("A", "3"),
            trip("B", "1"),
            trip("C", "2"),
        ]);

        let ranking = rank_groups(&companies, RankCriterion::Bottom, 2);

        assert_eq!(ranking.ordered_keys, vec!["B", "C"]);
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let companies = group_by_company(&[
            trip("late", "5"),
            trip("early", "5"),
            trip("big", "9"),
        ]);

        let top = rank_groups(&companies, RankCriterion::Top, 10);
        let bottom = rank_groups(&companies, RankCriterion::Bottom, 10);

        assert_eq!(top.ordered_keys, vec!["big", "late", "early"]);
        assert_eq!(bottom.ordered_keys, vec!["late", "early", "big"]);
    }

    #[test]
    fn test_ranking_size_law() {
        let records: Vec<TripRecord> = (0..15)
            .map(|i| trip(&format!("company-{i}"), &format!("{}.25", i * 2)))
            .collect();
        let companies = group_by_company(&records);

        for k in [0, 1, 10, 15, 40] {
            let ranking = rank_groups(&companies, RankCriterion::Top, k);
            assert_eq!(ranking.ordered_keys.len(), k.min(companies.len()));
        }
    }

    #[test]
    fn test_pruned_companies_are_not_ranked() {
        let companies = group_by_company(&[trip("ghost", "none"), trip("real", "1")]);

        let ranking = rank_groups(&companies, RankCriterion::Bottom, DEFAULT_RANK_WIDTH);

        assert_eq!(ranking.ordered_keys, vec!["real"]);
    }

    fn trip(company: &str, fare: &str) -> TripRecord {
        TripRecord::default()
            .with("company", company)
            .with("trip_seconds", "60")
            .with("fare", fare)
    }
}
