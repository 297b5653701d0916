//! Property-based tests for codes, scores, partitions and symmetry.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use mastermind_tree::core::{Code, NCODES, Score, ScoreTable};
use mastermind_tree::solver::PartitionResult;
use mastermind_tree::symmetry::{DistinctFollowers, NTRANSFORMS, Transform, TransformTable};

fn scores() -> &'static ScoreTable {
    static TABLE: OnceLock<ScoreTable> = OnceLock::new();
    TABLE.get_or_init(ScoreTable::new)
}

fn transforms() -> &'static TransformTable {
    static TABLE: OnceLock<TransformTable> = OnceLock::new();
    TABLE.get_or_init(TransformTable::new)
}

/// Strategy: any valid code.
fn code_strategy() -> impl Strategy<Value = Code> {
    (0..NCODES as u16).prop_map(|v| Code::new(v).unwrap())
}

/// Strategy: a problem of up to 80 distinct codes.
fn problem_strategy() -> impl Strategy<Value = Vec<Code>> {
    prop::collection::btree_set(0..NCODES as u16, 0..80)
        .prop_map(|set| set.into_iter().map(|v| Code::new(v).unwrap()).collect())
}

proptest! {
    // 1. Colors survive encoding
    #[test]
    fn encode_decode_colors(colors in prop::array::uniform4(0u8..6)) {
        let code = Code::encode(&colors).unwrap();
        prop_assert_eq!(code.colors(), colors);
        prop_assert_eq!(Code::decode(code.value()).unwrap(), colors);
    }

    // 2. Values survive decoding
    #[test]
    fn decode_encode_value(value in 0..NCODES as u16) {
        let colors = Code::decode(value).unwrap();
        prop_assert_eq!(Code::encode(&colors).unwrap().value(), value);
    }

    // 3. Out-of-range values are rejected
    #[test]
    fn out_of_range_rejected(value in NCODES as u16..) {
        prop_assert!(Code::new(value).is_err());
    }

    // 4. Scoring is symmetric and the table agrees with direct calculation
    #[test]
    fn score_symmetric(a in code_strategy(), b in code_strategy()) {
        let ab = scores().score(a, b);
        prop_assert_eq!(ab, scores().score(b, a));
        prop_assert_eq!(ab, Score::calculate(a, b));
        prop_assert!(ab.exact() + ab.approx() <= 4);
    }

    // 5. A code scores perfect against itself only
    #[test]
    fn score_perfect_iff_equal(a in code_strategy(), b in code_strategy()) {
        prop_assert!(scores().score(a, a).is_perfect());
        prop_assert_eq!(scores().score(a, b).is_perfect(), a == b);
    }

    // 6. Buckets cover the problem exactly once
    #[test]
    fn partition_covers_problem(problem in problem_strategy(), guess in code_strategy()) {
        let pr = PartitionResult::new(&problem, guess, scores());
        let sizes = pr.sizes();
        prop_assert_eq!(sizes.iter().sum::<usize>(), problem.len());
        prop_assert_eq!(pr.stats().total, problem.len());

        for score in Score::all() {
            for &code in pr.part(score) {
                prop_assert_eq!(scores().score(guess, code), score);
            }
        }
    }

    // 7. The perfect bucket is non-empty exactly when the guess is live
    #[test]
    fn perfect_bucket_membership(problem in problem_strategy(), guess in code_strategy()) {
        let pr = PartitionResult::new(&problem, guess, scores());
        let member = problem.contains(&guess);
        prop_assert_eq!(pr.stats().in_solution, member);
        prop_assert_eq!(!pr.part(Score::PERFECT).is_empty(), member);
    }

    // 8. Optimal means every non-perfect bucket holds at most one code
    #[test]
    fn partition_optimal_iff_singletons(problem in problem_strategy(), guess in code_strategy()) {
        let pr = PartitionResult::new(&problem, guess, scores());
        let singletons = Score::all()
            .filter(|s| !s.is_perfect())
            .all(|s| pr.part(s).len() <= 1);
        prop_assert_eq!(pr.stats().optimal, singletons && problem.len() > 2);
    }

    // 9. The identity transform fixes every code
    #[test]
    fn identity_transform(code in code_strategy()) {
        prop_assert_eq!(transforms().apply(Transform::IDENTITY, code), code);
    }

    // 10. Transforms preserve scores
    #[test]
    fn transforms_preserve_scores(
        a in code_strategy(),
        b in code_strategy(),
        index in 0..NTRANSFORMS,
    ) {
        let table = transforms();
        let t = table.all()[index];
        prop_assert_eq!(
            scores().score(table.apply(t, a), table.apply(t, b)),
            scores().score(a, b)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // 11. Longer prefixes never gain preserving transforms
    #[test]
    fn preserving_monotone(prefix in prop::collection::vec(code_strategy(), 1..4)) {
        let table = transforms();
        let mut previous = table.all().len();
        for k in 1..=prefix.len() {
            let preserving = table.preserving(&prefix[..k], table.all());
            prop_assert!(preserving.len() <= previous);
            prop_assert!(preserving.contains(&Transform::IDENTITY));
            previous = preserving.len();
        }
    }

    // 12. No two distinct followers share an orbit
    #[test]
    fn distinct_followers_orbit_distinct(prefix in prop::collection::vec(code_strategy(), 1..3)) {
        let table = transforms();
        let preserving = table.preserving(&prefix, table.all());
        let distinct = DistinctFollowers::new(table).distinct_after(&prefix);

        let reps: BTreeSet<Code> = distinct
            .iter()
            .map(|&c| table.representative(&preserving, c))
            .collect();
        prop_assert_eq!(reps.len(), distinct.len());
        prop_assert!(distinct.iter().all(|c| !prefix.contains(c)));
    }
}
