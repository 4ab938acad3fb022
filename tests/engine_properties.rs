use proptest::prelude::*;

use markovian::engine::{apply, Halt};
use markovian::rules::{Rule, RuleSet};

fn rule_sets() -> impl Strategy<Value = RuleSet> {
    proptest::collection::vec(("[ab]{1,3}", "[ab]{0,3}"), 0..4).prop_map(|pairs| {
        RuleSet::new(
            pairs
                .iter()
                .map(|(pattern, replacement)| Rule::new(pattern, replacement, false).expect("valid rule"))
                .collect(),
        )
    })
}

proptest! {
    #[test]
    fn trace_is_numbered_one_to_steps(word in "[ab]{0,8}", rules in rule_sets(), limit in 0usize..40) {
        let run = apply(&word, &rules, limit);
        prop_assert_eq!(run.steps, run.trace.len());
        prop_assert!(run.steps <= limit);
        for (i, entry) in run.trace.iter().enumerate() {
            prop_assert_eq!(entry.step, i + 1);
        }
        if let Some(last) = run.trace.last() {
            prop_assert_eq!(&last.word, &run.output);
        }
    }

    #[test]
    fn runs_are_deterministic(word in "[ab]{0,8}", rules in rule_sets(), limit in 0usize..40) {
        prop_assert_eq!(apply(&word, &rules, limit), apply(&word, &rules, limit));
    }

    #[test]
    fn fixed_point_output_takes_no_steps(word in "[ab]{0,8}", rules in rule_sets()) {
        let run = apply(&word, &rules, 30);
        if run.halt == Halt::FixedPoint {
            prop_assert!(rules.iter().all(|r| !run.output.contains(r.pattern())));
            prop_assert_eq!(apply(&run.output, &rules, 30).steps, 0);
        }
    }

    #[test]
    fn raising_the_limit_never_loses_steps(word in "[ab]{0,8}", rules in rule_sets(), limit in 0usize..30, extra in 0usize..30) {
        let shorter = apply(&word, &rules, limit);
        let longer = apply(&word, &rules, limit + extra);
        prop_assert!(longer.steps >= shorter.steps);
        prop_assert_eq!(&longer.trace[..shorter.steps], &shorter.trace[..]);
        if !shorter.truncated {
            prop_assert_eq!(longer.steps, shorter.steps);
        }
    }

    #[test]
    fn first_listed_matching_rule_is_applied(word in "[ab]{0,8}", rules in rule_sets()) {
        let run = apply(&word, &rules, 20);
        let mut previous = word.clone();
        for entry in &run.trace {
            let expected = rules.iter().position(|r| previous.contains(r.pattern()));
            prop_assert_eq!(Some(entry.rule), expected);
            previous = entry.word.clone();
        }
    }
}
