use serde::Serialize;

use crate::catalog::OwnershipCatalog;
use crate::core::instance::Instance;
use crate::core::student::MAX_PREFERENCES;
use crate::matching::engine::MatchOutcome;

/// Safely convert a count to f64 for rate calculations.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// How well students' preferences were met.
///
/// Ranks are 1-based: rank 1 means the student got their first choice. The
/// aggregate fields are `None` when nobody is matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionStats {
    pub average_rank: Option<f64>,
    pub median_rank: Option<f64>,
    pub min_rank: Option<u32>,
    pub max_rank: Option<u32>,
    /// Population standard deviation of ranks.
    pub std_rank: Option<f64>,
    pub matched: usize,
    pub unmatched: usize,
    /// Matched students per rank; index 0 counts rank 1.
    pub rank_histogram: [usize; MAX_PREFERENCES],
}

impl SatisfactionStats {
    #[must_use]
    pub fn compute(instance: &Instance, outcome: &MatchOutcome) -> Self {
        let mut ranks: Vec<u32> = Vec::new();
        let mut rank_histogram = [0usize; MAX_PREFERENCES];

        for student in instance.student_ids() {
            if let Some(topic) = outcome.assignment_of(student) {
                let rank = instance
                    .student(student)
                    .rank_of(topic)
                    .expect("assignments always come from the preference list")
                    as u32
                    + 1;
                rank_histogram[rank as usize - 1] += 1;
                ranks.push(rank);
            }
        }

        let matched = ranks.len();
        let unmatched = instance.students.len() - matched;

        if ranks.is_empty() {
            return Self {
                average_rank: None,
                median_rank: None,
                min_rank: None,
                max_rank: None,
                std_rank: None,
                matched,
                unmatched,
                rank_histogram,
            };
        }

        ranks.sort_unstable();
        let sum: u32 = ranks.iter().sum();
        let mean = f64::from(sum) / count_to_f64(matched);
        let variance = ranks
            .iter()
            .map(|&r| {
                let d = f64::from(r) - mean;
                d * d
            })
            .sum::<f64>()
            / count_to_f64(matched);

        let median = if matched % 2 == 1 {
            f64::from(ranks[matched / 2])
        } else {
            f64::from(ranks[matched / 2 - 1] + ranks[matched / 2]) / 2.0
        };

        Self {
            average_rank: Some(mean),
            median_rank: Some(median),
            min_rank: Some(ranks[0]),
            max_rank: Some(ranks[matched - 1]),
            std_rank: Some(variance.sqrt()),
            matched,
            unmatched,
            rank_histogram,
        }
    }
}

/// Load against capacity for one supervisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorUtilization {
    pub supervisor: String,
    pub load: u32,
    pub capacity: u32,
    pub utilization: f64,
}

/// Match rates and resource utilization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyStats {
    pub total_students: usize,
    pub matched_students: usize,
    pub match_rate: f64,
    pub total_topics: usize,
    /// Topics holding at least one student.
    pub filled_topics: usize,
    pub topic_utilization: f64,
    pub mean_supervisor_utilization: f64,
    pub supervisors: Vec<SupervisorUtilization>,
}

impl EfficiencyStats {
    #[must_use]
    pub fn compute(instance: &Instance, outcome: &MatchOutcome) -> Self {
        let total_students = instance.students.len();
        let matched_students = outcome.matched_count();
        let match_rate = if total_students == 0 {
            0.0
        } else {
            count_to_f64(matched_students) / count_to_f64(total_students)
        };

        let mut topic_filled = vec![false; instance.topics.len()];
        for student in instance.student_ids() {
            if let Some(topic) = outcome.assignment_of(student) {
                topic_filled[topic.index()] = true;
            }
        }
        let filled_topics = topic_filled.iter().filter(|&&f| f).count();
        let total_topics = instance.topics.len();
        let topic_utilization = if total_topics == 0 {
            0.0
        } else {
            count_to_f64(filled_topics) / count_to_f64(total_topics)
        };

        let supervisors: Vec<SupervisorUtilization> = instance
            .supervisor_ids()
            .map(|id| {
                let record = instance.supervisor(id);
                let load = outcome.load[id.index()];
                SupervisorUtilization {
                    supervisor: record.name.clone(),
                    load,
                    capacity: record.capacity,
                    utilization: f64::from(load) / f64::from(record.capacity),
                }
            })
            .collect();
        let mean_supervisor_utilization = if supervisors.is_empty() {
            0.0
        } else {
            supervisors.iter().map(|s| s.utilization).sum::<f64>()
                / count_to_f64(supervisors.len())
        };

        Self {
            total_students,
            matched_students,
            match_rate,
            total_topics,
            filled_topics,
            topic_utilization,
            mean_supervisor_utilization,
            supervisors,
        }
    }
}

/// Distribution of satisfaction across all students, matched or not.
///
/// The satisfaction score of a matched student is `|prefs| - rank + 1`
/// (first choice on a full list scores 5); unmatched students score 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessStats {
    /// 0 = perfect equality, 1 = maximum inequality. `None` with no
    /// students.
    pub gini_coefficient: Option<f64>,
    pub variance: Option<f64>,
    pub coefficient_of_variation: Option<f64>,
}

impl FairnessStats {
    #[must_use]
    pub fn compute(instance: &Instance, outcome: &MatchOutcome) -> Self {
        let scores: Vec<f64> = instance
            .student_ids()
            .map(|student| {
                let record = instance.student(student);
                match outcome.assignment_of(student).and_then(|t| record.rank_of(t)) {
                    Some(rank) => count_to_f64(record.preferences.len() - rank),
                    None => 0.0,
                }
            })
            .collect();

        if scores.is_empty() {
            return Self {
                gini_coefficient: None,
                variance: None,
                coefficient_of_variation: None,
            };
        }

        let n = count_to_f64(scores.len());
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
        let coefficient_of_variation = if mean > 0.0 {
            Some(variance.sqrt() / mean)
        } else {
            None
        };

        Self {
            gini_coefficient: Some(gini(&scores)),
            variance: Some(variance),
            coefficient_of_variation,
        }
    }
}

/// Gini coefficient of non-negative values; 0.0 when all values are equal
/// (including all-zero).
fn gini(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("scores are finite"));

    let n = count_to_f64(sorted.len());
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (count_to_f64(i) + 1.0) * v)
        .sum();

    (2.0 * weighted) / (n * total) - (n + 1.0) / n
}

/// Result of verifying the capacity and consistency constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintCheck {
    pub all_satisfied: bool,
    /// Human-readable descriptions; empty on a correct engine run.
    pub violations: Vec<String>,
}

/// Verify the outcome against the hard constraints: supervisor loads within
/// capacity and consistent with assignments, every assignment drawn from the
/// student's own list and supervised by the derived owner.
#[must_use]
pub fn verify_constraints(
    instance: &Instance,
    catalog: &OwnershipCatalog,
    outcome: &MatchOutcome,
) -> ConstraintCheck {
    let mut violations = Vec::new();
    let mut recounted = vec![0u32; instance.supervisors.len()];

    for student in instance.student_ids() {
        let Some(topic) = outcome.assignment_of(student) else {
            continue;
        };
        let record = instance.student(student);

        if record.rank_of(topic).is_none() {
            violations.push(format!(
                "student {} assigned to {} which is not in their preference list",
                record.name,
                instance.topic(topic).name
            ));
        }

        match catalog.owner(topic, record.program) {
            Some(ownership) => recounted[ownership.supervisor.index()] += 1,
            None => violations.push(format!(
                "student {} assigned to {} which has no supervisor for {}",
                record.name,
                instance.topic(topic).name,
                instance.program_tag(record.program)
            )),
        }
    }

    for supervisor in instance.supervisor_ids() {
        let record = instance.supervisor(supervisor);
        let load = outcome.load[supervisor.index()];

        if load > record.capacity {
            violations.push(format!(
                "supervisor {} over capacity: {}/{}",
                record.name, load, record.capacity
            ));
        }
        if recounted[supervisor.index()] != load {
            violations.push(format!(
                "supervisor {} load {} disagrees with assignments ({})",
                record.name,
                load,
                recounted[supervisor.index()]
            ));
        }
    }

    ConstraintCheck {
        all_satisfied: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProgramResolver;
    use crate::matching::engine::MatchEngine;
    use crate::parsing::validate::{build_instance, ValidatorConfig};

    fn run(students: &str, topics: &str, supervisors: &str) -> (Instance, OwnershipCatalog, MatchOutcome) {
        let instance = build_instance(
            students,
            topics,
            supervisors,
            &ProgramResolver::default(),
            &ValidatorConfig::default(),
        )
        .unwrap();
        let catalog = OwnershipCatalog::build(&instance);
        let outcome = MatchEngine::new(&instance, &catalog).run();
        (instance, catalog, outcome)
    }

    #[test]
    fn test_satisfaction_all_first_choice() {
        let (instance, _, outcome) = run(
            "BDBA001: T01, T02\nBDBA002: T02, T01\n",
            "T01: A\nT02: A\n",
            "SUP01: 2, BDBA:T01:Expert, BDBA:T02:Expert\n",
        );

        let stats = SatisfactionStats::compute(&instance, &outcome);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.unmatched, 0);
        assert_eq!(stats.average_rank, Some(1.0));
        assert_eq!(stats.median_rank, Some(1.0));
        assert_eq!(stats.min_rank, Some(1));
        assert_eq!(stats.max_rank, Some(1));
        assert_eq!(stats.std_rank, Some(0.0));
        assert_eq!(stats.rank_histogram, [2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_satisfaction_no_matches() {
        let (instance, _, outcome) = run(
            "BCSAI001: T01\n",
            "T01: A\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );

        let stats = SatisfactionStats::compute(&instance, &outcome);
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.unmatched, 1);
        assert_eq!(stats.average_rank, None);
    }

    #[test]
    fn test_efficiency() {
        let (instance, _, outcome) = run(
            "BDBA001: T01, T02\nBDBA002: T01, T02\nBCSAI001: T01\n",
            "T01: A\nT02: A\nT03: A\n",
            "SUP01: 1, BDBA:T01:Expert\nSUP02: 1, BDBA:T02:Expert\n",
        );

        let stats = EfficiencyStats::compute(&instance, &outcome);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.matched_students, 2);
        assert!((stats.match_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.filled_topics, 2);
        assert_eq!(stats.total_topics, 3);
        // Both supervisors at full load.
        assert!((stats.mean_supervisor_utilization - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_gini_equal_scores_is_zero() {
        assert!((gini(&[3.0, 3.0, 3.0]) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_gini_total_inequality_approaches_limit() {
        // One student takes everything: Gini = (n-1)/n.
        let g = gini(&[0.0, 0.0, 0.0, 12.0]);
        assert!((g - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_fairness_on_uniform_outcome() {
        let (instance, _, outcome) = run(
            "BDBA001: T01, T02\nBDBA002: T02, T01\n",
            "T01: A\nT02: A\n",
            "SUP01: 2, BDBA:T01:Expert, BDBA:T02:Expert\n",
        );

        let stats = FairnessStats::compute(&instance, &outcome);
        assert_eq!(stats.gini_coefficient, Some(0.0));
        assert_eq!(stats.variance, Some(0.0));
    }

    #[test]
    fn test_constraints_clean_run() {
        let (instance, catalog, outcome) = run(
            "BDBA001: T01\nBDBA002: T01\n",
            "T01: A\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );

        let check = verify_constraints(&instance, &catalog, &outcome);
        assert!(check.all_satisfied, "violations: {:?}", check.violations);
    }

    #[test]
    fn test_constraints_flag_corrupted_outcome() {
        let (instance, catalog, mut outcome) = run(
            "BDBA001: T01\n",
            "T01: A\nT02: B\n",
            "SUP01: 1, BDBA:T01:Expert\n",
        );
        // Point the assignment at a topic outside the preference list.
        let t02 = instance
            .topic_ids()
            .find(|&t| instance.topic(t).name == "T02")
            .unwrap();
        outcome.assignment[0] = Some(t02);

        let check = verify_constraints(&instance, &catalog, &outcome);
        assert!(!check.all_satisfied);
        assert!(!check.violations.is_empty());
    }
}
