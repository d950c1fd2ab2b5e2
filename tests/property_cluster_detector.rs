use proptest::prelude::*;
use std::collections::HashSet;
use villagewatch::domain::models::{Coordinates, RiskLevel, Village};
use villagewatch::services::{distance_meters, group_villages};

fn risk_level() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Green),
        Just(RiskLevel::Yellow),
        Just(RiskLevel::Red),
    ]
}

/// Villages scattered over roughly a 100 km box so that both clustered and
/// isolated layouts come up.
fn village_sets() -> impl Strategy<Value = Vec<Village>> {
    prop::collection::vec((15.8f64..16.7, 80.6f64..81.5, risk_level()), 0..25).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lng, status))| {
                Village::new(format!("v{i}"), format!("Village {i}"), "Krishna", Coordinates::new(lat, lng), 1000)
                    .with_status(status)
            })
            .collect()
    })
}

fn ids(groups: Vec<Vec<&Village>>) -> Vec<Vec<String>> {
    groups
        .into_iter()
        .map(|g| g.into_iter().map(|v| v.id.clone()).collect())
        .collect()
}

proptest! {
    /// Property: groups are disjoint and hold at least two at-risk villages
    #[test]
    fn prop_groups_disjoint_and_at_risk(villages in village_sets(), threshold in 1_000.0f64..40_000.0) {
        let groups = group_villages(&villages, threshold);
        let mut seen = HashSet::new();

        for group in &groups {
            prop_assert!(group.len() >= 2);
            for village in group {
                prop_assert!(village.status != RiskLevel::Green);
                prop_assert!(seen.insert(village.id.clone()), "{} in two groups", village.id);
            }
        }
    }

    /// Property: every member lies within the threshold of its anchor
    #[test]
    fn prop_members_within_threshold_of_anchor(villages in village_sets(), threshold in 1_000.0f64..40_000.0) {
        for group in group_villages(&villages, threshold) {
            let anchor = group[0];
            for member in &group[1..] {
                prop_assert!(distance_meters(anchor.coordinates, member.coordinates) <= threshold);
            }
        }
    }

    /// Property: groups and their members keep input order
    #[test]
    fn prop_groups_preserve_input_order(villages in village_sets(), threshold in 1_000.0f64..40_000.0) {
        let position = |id: &str| villages.iter().position(|v| v.id == id);
        let groups = group_villages(&villages, threshold);

        for group in &groups {
            let indices: Vec<_> = group.iter().map(|v| position(&v.id)).collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }
        let anchors: Vec<_> = groups.iter().map(|g| position(&g[0].id)).collect();
        prop_assert!(anchors.windows(2).all(|w| w[0] < w[1]));
    }

    /// Property: green villages have no effect on grouping
    #[test]
    fn prop_green_villages_are_ignored(villages in village_sets(), threshold in 1_000.0f64..40_000.0) {
        let at_risk: Vec<Village> = villages.iter().filter(|v| v.is_at_risk()).cloned().collect();
        prop_assert_eq!(
            ids(group_villages(&villages, threshold)),
            ids(group_villages(&at_risk, threshold))
        );
    }
}
