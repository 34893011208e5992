//! Cross-record validation and identifier interning.
//!
//! Takes the raw records from the three stream parsers and produces a
//! validated [`Instance`], or every problem found in one [`ValidationErrors`]
//! failure. Identifiers are interned into dense handles here; no raw string
//! lookup survives past this boundary.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::catalog::programs::{normalize_tag, ProgramResolver};
use crate::core::instance::Instance;
use crate::core::student::{Student, MAX_PREFERENCES};
use crate::core::supervisor::{ExpertiseEntry, Supervisor, MAX_CAPACITY, MIN_CAPACITY};
use crate::core::topic::Topic;
use crate::core::types::{ProgramId, TopicId};
use crate::parsing::error::{InputError, SemanticError, Stream, ValidationErrors};
use crate::parsing::students::{parse_students, RawStudent};
use crate::parsing::supervisors::{parse_supervisors, RawSupervisor};
use crate::parsing::topics::{parse_topics, RawTopic};

/// Validation knobs.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Require exactly [`MAX_PREFERENCES`] preferences per student instead
    /// of accepting 1 to [`MAX_PREFERENCES`].
    pub strict_preferences: bool,
}

/// Parse and validate the three input streams into an [`Instance`].
///
/// All syntax and semantic errors are accumulated; the result is `Err` if
/// any were found, carrying the full sorted list.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every problem found across the streams.
pub fn build_instance(
    students_text: &str,
    topics_text: &str,
    supervisors_text: &str,
    resolver: &ProgramResolver,
    config: &ValidatorConfig,
) -> Result<Instance, ValidationErrors> {
    let mut errors = Vec::new();

    let raw_students = parse_students(students_text, &mut errors);
    let raw_topics = parse_topics(topics_text, &mut errors);
    let raw_supervisors = parse_supervisors(supervisors_text, &mut errors);

    let (topics, topic_index) = check_topics(&raw_topics, &mut errors);
    let programs = collect_programs(&raw_students, &raw_supervisors, resolver);
    let program_index: HashMap<&str, ProgramId> = programs
        .iter()
        .enumerate()
        .map(|(i, tag)| (tag.as_str(), ProgramId(i as u32)))
        .collect();

    let students = check_students(
        &raw_students,
        &topic_index,
        &program_index,
        resolver,
        config,
        &mut errors,
    );
    let supervisors = check_supervisors(&raw_supervisors, &topic_index, &program_index, &mut errors);

    if errors.is_empty() {
        Ok(Instance {
            students,
            topics,
            supervisors,
            programs,
        })
    } else {
        errors.sort_by_key(|e| (e.stream as u8, e.line));
        Err(ValidationErrors { errors })
    }
}

/// Detect duplicate ids and missing areas; intern topics sorted by id.
fn check_topics(
    raw: &[RawTopic],
    errors: &mut Vec<InputError>,
) -> (Vec<Topic>, HashMap<String, TopicId>) {
    let mut first_seen: HashMap<&str, &RawTopic> = HashMap::new();

    for topic in raw {
        if topic.area.is_empty() {
            errors.push(InputError::semantic(
                Stream::Topics,
                topic.line,
                SemanticError::MissingArea(topic.id.clone()),
            ));
        }
        if first_seen.insert(&topic.id, topic).is_some() {
            errors.push(InputError::semantic(
                Stream::Topics,
                topic.line,
                SemanticError::DuplicateTopic(topic.id.clone()),
            ));
        }
    }

    let mut topics: Vec<Topic> = first_seen
        .values()
        .map(|t| Topic {
            name: t.id.clone(),
            area: t.area.clone(),
        })
        .collect();
    topics.sort_by(|a, b| a.name.cmp(&b.name));

    let index = topics
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), TopicId(i as u32)))
        .collect();

    (topics, index)
}

/// Every program tag occurring anywhere in the input, canonical and sorted.
fn collect_programs(
    students: &[RawStudent],
    supervisors: &[RawSupervisor],
    resolver: &ProgramResolver,
) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for student in students {
        tags.insert(resolver.resolve(&student.id));
    }
    for supervisor in supervisors {
        for entry in &supervisor.entries {
            tags.insert(normalize_tag(&entry.program));
        }
    }
    tags.into_iter().collect()
}

fn check_students(
    raw: &[RawStudent],
    topic_index: &HashMap<String, TopicId>,
    program_index: &HashMap<&str, ProgramId>,
    resolver: &ProgramResolver,
    config: &ValidatorConfig,
    errors: &mut Vec<InputError>,
) -> Vec<Student> {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut students = Vec::new();

    for student in raw {
        if !seen_ids.insert(&student.id) {
            errors.push(InputError::semantic(
                Stream::Students,
                student.line,
                SemanticError::DuplicateStudent(student.id.clone()),
            ));
            continue;
        }

        let count = student.preferences.len();
        if config.strict_preferences && count != MAX_PREFERENCES {
            errors.push(InputError::semantic(
                Stream::Students,
                student.line,
                SemanticError::PreferenceCountNotExact {
                    student: student.id.clone(),
                    count,
                },
            ));
        } else if count == 0 || count > MAX_PREFERENCES {
            errors.push(InputError::semantic(
                Stream::Students,
                student.line,
                SemanticError::PreferenceCountOutOfRange {
                    student: student.id.clone(),
                    count,
                },
            ));
        }

        let mut listed: HashSet<&str> = HashSet::new();
        let mut preferences = Vec::with_capacity(count);
        for token in &student.preferences {
            if !listed.insert(token) {
                errors.push(InputError::semantic(
                    Stream::Students,
                    student.line,
                    SemanticError::DuplicatePreference {
                        student: student.id.clone(),
                        topic: token.clone(),
                    },
                ));
                continue;
            }
            match topic_index.get(token) {
                Some(&topic) => preferences.push(topic),
                None => errors.push(InputError::semantic(
                    Stream::Students,
                    student.line,
                    SemanticError::UnknownTopic {
                        record: student.id.clone(),
                        topic: token.clone(),
                    },
                )),
            }
        }

        let tag = resolver.resolve(&student.id);
        let program = program_index[tag.as_str()];

        students.push(Student {
            name: student.id.clone(),
            program,
            preferences,
        });
    }

    // Handle order must equal lexicographic id order.
    students.sort_by(|a, b| a.name.cmp(&b.name));
    students
}

fn check_supervisors(
    raw: &[RawSupervisor],
    topic_index: &HashMap<String, TopicId>,
    program_index: &HashMap<&str, ProgramId>,
    errors: &mut Vec<InputError>,
) -> Vec<Supervisor> {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut supervisors = Vec::new();

    for supervisor in raw {
        if !seen_ids.insert(&supervisor.id) {
            errors.push(InputError::semantic(
                Stream::Supervisors,
                supervisor.line,
                SemanticError::DuplicateSupervisor(supervisor.id.clone()),
            ));
            continue;
        }

        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&supervisor.capacity) {
            errors.push(InputError::semantic(
                Stream::Supervisors,
                supervisor.line,
                SemanticError::CapacityOutOfRange {
                    supervisor: supervisor.id.clone(),
                    capacity: supervisor.capacity,
                },
            ));
        }

        if supervisor.entries.is_empty() {
            errors.push(InputError::semantic(
                Stream::Supervisors,
                supervisor.line,
                SemanticError::EmptySupervisorEntries(supervisor.id.clone()),
            ));
        }

        let mut declared: HashSet<(String, &str)> = HashSet::new();
        let mut entries = Vec::with_capacity(supervisor.entries.len());
        for entry in &supervisor.entries {
            let tag = normalize_tag(&entry.program);

            if !declared.insert((tag.clone(), &entry.topic)) {
                errors.push(InputError::semantic(
                    Stream::Supervisors,
                    supervisor.line,
                    SemanticError::DuplicateEntry {
                        supervisor: supervisor.id.clone(),
                        program: tag.clone(),
                        topic: entry.topic.clone(),
                    },
                ));
                continue;
            }

            match topic_index.get(&entry.topic) {
                Some(&topic) => entries.push(ExpertiseEntry {
                    program: program_index[tag.as_str()],
                    topic,
                    level: entry.level,
                }),
                None => errors.push(InputError::semantic(
                    Stream::Supervisors,
                    supervisor.line,
                    SemanticError::UnknownTopic {
                        record: supervisor.id.clone(),
                        topic: entry.topic.clone(),
                    },
                )),
            }
        }

        supervisors.push(Supervisor {
            name: supervisor.id.clone(),
            capacity: supervisor.capacity,
            entries,
        });
    }

    // Handle order must equal lexicographic id order; the ownership
    // tie-break depends on it.
    supervisors.sort_by(|a, b| a.name.cmp(&b.name));
    supervisors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(
        students: &str,
        topics: &str,
        supervisors: &str,
    ) -> Result<Instance, ValidationErrors> {
        build_instance(
            students,
            topics,
            supervisors,
            &ProgramResolver::default(),
            &ValidatorConfig::default(),
        )
    }

    const TOPICS: &str = "T01: Data Science\nT02: Machine Learning\nT03: Computer Science\n";

    #[test]
    fn test_valid_input() {
        let instance = validate(
            "BDBA001: T01, T02\nBCSAI001: T03\n",
            TOPICS,
            "SUP01: 5, BDBA:T01:Expert, BCSAI:T03:Advanced\n",
        )
        .unwrap();

        assert_eq!(instance.students.len(), 2);
        assert_eq!(instance.topics.len(), 3);
        assert_eq!(instance.supervisors.len(), 1);
        // BCSAI001 sorts before BDBA001.
        assert_eq!(instance.students[0].name, "BCSAI001");
        assert_eq!(instance.students[1].name, "BDBA001");
        assert_eq!(
            instance.program_tag(instance.students[1].program),
            "BDBA"
        );
    }

    #[test]
    fn test_unknown_topic_in_preferences() {
        let err = validate("BDBA001: T01, T99\n", TOPICS, "SUP01: 5, BDBA:T01:Expert\n")
            .unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert!(err.errors[0].to_string().contains("T99"));
    }

    #[test]
    fn test_duplicate_preference() {
        let err = validate("BDBA001: T01, T01\n", TOPICS, "SUP01: 5, BDBA:T01:Expert\n")
            .unwrap_err();

        assert!(err.errors[0].to_string().contains("more than once"));
    }

    #[test]
    fn test_preference_count_bounds() {
        let err = validate(
            "BDBA001: T01, T02, T03, T04, T05, T06\n",
            "T01: A\nT02: A\nT03: A\nT04: A\nT05: A\nT06: A\n",
            "SUP01: 5, BDBA:T01:Expert\n",
        )
        .unwrap_err();

        assert!(err.errors[0].to_string().contains("6 preferences"));
    }

    #[test]
    fn test_strict_mode_requires_exactly_five() {
        let result = build_instance(
            "BDBA001: T01, T02\n",
            TOPICS,
            "SUP01: 5, BDBA:T01:Expert\n",
            &ProgramResolver::default(),
            &ValidatorConfig {
                strict_preferences: true,
            },
        );

        let err = result.unwrap_err();
        assert!(err.errors[0].to_string().contains("exactly 5"));
    }

    #[test]
    fn test_capacity_out_of_range() {
        for capacity in ["0", "11"] {
            let err = validate(
                "BDBA001: T01\n",
                TOPICS,
                &format!("SUP01: {capacity}, BDBA:T01:Expert\n"),
            )
            .unwrap_err();
            assert!(err.errors[0].to_string().contains("expected 1 to 10"));
        }
    }

    #[test]
    fn test_duplicate_topic() {
        let err = validate(
            "BDBA001: T01\n",
            "T01: A\nT01: B\n",
            "SUP01: 5, BDBA:T01:Expert\n",
        )
        .unwrap_err();

        assert!(err.errors[0].to_string().contains("duplicate topic"));
    }

    #[test]
    fn test_missing_area() {
        let err = validate("BDBA001: T01\n", "T01:\n", "SUP01: 5, BDBA:T01:Expert\n")
            .unwrap_err();

        assert!(err.errors[0].to_string().contains("no area"));
    }

    #[test]
    fn test_duplicate_entry_same_pair_different_spelling() {
        // BBA_BDBA and BBA+BDBA normalize to the same program tag.
        let err = validate(
            "BDBA001: T01\n",
            TOPICS,
            "SUP01: 5, BBA_BDBA:T01:Expert, BBA+BDBA:T01:Advanced\n",
        )
        .unwrap_err();

        assert!(err.errors[0].to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_supervisor_entries() {
        let err = validate("BDBA001: T01\n", TOPICS, "SUP01: 5\n").unwrap_err();
        assert!(err.errors[0].to_string().contains("no expertise entries"));
    }

    #[test]
    fn test_errors_accumulate_across_streams() {
        let err = validate(
            "BDBA001: T01, T99\nBDBA001: T01\n",
            "T01: A\nT01: B\n",
            "SUP01: 99, BDBA:T01:Expert\n",
        )
        .unwrap_err();

        // unknown topic + duplicate student + duplicate topic + capacity
        assert_eq!(err.errors.len(), 4);
        // Sorted students first, then topics, then supervisors.
        assert_eq!(err.errors[0].stream, Stream::Students);
        assert_eq!(err.errors.last().unwrap().stream, Stream::Supervisors);
    }

    #[test]
    fn test_empty_students_stream_is_valid() {
        let instance = validate("", TOPICS, "SUP01: 5, BDBA:T01:Expert\n").unwrap();
        assert!(instance.students.is_empty());
    }
}
