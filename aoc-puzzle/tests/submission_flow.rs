//! End-to-end tests of the submit/get/view workflows against a fake service

use aoc_puzzle::{
    AnswerHint, Coordinator, DaySpec, Part, PuzzleCache, PuzzleError, PuzzleIdentity,
    PuzzleRecord, RefreshPolicy, RemoteGateway, Resolution, ScrapedPuzzle, SubmissionAttempt,
    SubmitOutcome, TransportError, Verdict, resolve,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// In-memory stand-in for the puzzle service
#[derive(Default)]
struct FakeService {
    state: RefCell<ServiceState>,
}

#[derive(Default)]
struct ServiceState {
    solved: BTreeSet<Part>,
    verdicts: VecDeque<Result<Verdict, TransportError>>,
    /// Scrapes that still hide part 2 after it became available
    stale_scrapes: u32,
    fail_scrapes: bool,
    scrapes: usize,
    attempts: Vec<SubmissionAttempt>,
}

impl FakeService {
    fn with_verdicts(verdicts: impl IntoIterator<Item = Result<Verdict, TransportError>>) -> Self {
        let service = Self::default();
        service.state.borrow_mut().verdicts = verdicts.into_iter().collect();
        service
    }

    fn scrapes(&self) -> usize {
        self.state.borrow().scrapes
    }

    fn attempts(&self) -> Vec<SubmissionAttempt> {
        self.state.borrow().attempts.clone()
    }
}

impl RemoteGateway for FakeService {
    fn scrape(&self, _identity: PuzzleIdentity) -> Result<PuzzleRecord, TransportError> {
        let mut state = self.state.borrow_mut();
        state.scrapes += 1;
        if state.fail_scrapes {
            return Err(TransportError::timeout("scrape timed out"));
        }

        let mut questions = vec!["--- Part One ---".to_string()];
        let mut answers = Vec::new();
        if state.solved.contains(&Part::One) {
            if state.stale_scrapes > 0 {
                state.stale_scrapes -= 1;
            } else {
                questions.push("--- Part Two ---".to_string());
                answers.push("42".to_string());
                if state.solved.contains(&Part::Two) {
                    answers.push("1337".to_string());
                }
            }
        }

        Ok(PuzzleRecord::from_scrape(ScrapedPuzzle {
            questions,
            answers,
            input: "3   4\n4   3\n".to_string(),
        }))
    }

    fn submit(&self, attempt: &SubmissionAttempt) -> Result<Verdict, TransportError> {
        let mut state = self.state.borrow_mut();
        state.attempts.push(attempt.clone());
        let verdict = state
            .verdicts
            .pop_front()
            .unwrap_or(Ok(Verdict::Incorrect { hint: None }));
        if let Ok(Verdict::Correct) = verdict {
            state.solved.insert(attempt.part);
        }
        verdict
    }

    fn current_year(&self) -> u16 {
        2024
    }

    fn latest_unlocked_day(&self, year: u16) -> Option<u8> {
        (year == 2024).then_some(6)
    }
}

fn identity() -> PuzzleIdentity {
    PuzzleIdentity::new(2024, 6).unwrap()
}

fn no_backoff(attempts: u32) -> RefreshPolicy {
    RefreshPolicy {
        attempts,
        initial_backoff: Duration::ZERO,
    }
}

fn coordinator<'a>(service: &'a FakeService, temp: &TempDir) -> Coordinator<&'a FakeService> {
    Coordinator::new(service, PuzzleCache::new(temp.path())).with_refresh_policy(no_backoff(3))
}

#[test]
fn correct_part_one_marks_solved_and_refreshes() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct)]);
    let coordinator = coordinator(&service, &temp);

    let outcome = coordinator.submit(identity(), None, "42").unwrap();

    match outcome {
        SubmitOutcome::Accepted {
            part,
            refreshed,
            record,
        } => {
            assert_eq!(part, Part::One);
            assert!(refreshed);
            assert!(record.is_solved(Part::One));
            assert_eq!(record.question_part2.as_deref(), Some("--- Part Two ---"));
        }
        other => panic!("Expected Accepted, got {:?}", other),
    }

    // Cold fetch plus one refresh
    assert_eq!(service.scrapes(), 2);
    let cached = coordinator.cache().get(identity()).unwrap().unwrap();
    assert!(cached.is_solved(Part::One));
    assert_eq!(cached.answer_part1.as_deref(), Some("42"));
    assert!(cached.question_part2.is_some());
}

#[test]
fn correct_part_two_completes_without_refresh() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct), Ok(Verdict::Correct)]);
    let coordinator = coordinator(&service, &temp);

    coordinator.submit(identity(), None, "42").unwrap();
    let scrapes_before = service.scrapes();

    let outcome = coordinator.submit(identity(), None, "1337").unwrap();
    let SubmitOutcome::Accepted {
        part,
        refreshed,
        record,
    } = outcome
    else {
        panic!("Expected Accepted");
    };

    assert_eq!(part, Part::Two);
    assert!(!refreshed);
    assert!(record.is_complete());
    assert_eq!(record.answer_part2.as_deref(), Some("1337"));
    assert_eq!(service.scrapes(), scrapes_before);
}

#[test]
fn complete_puzzle_fails_before_any_network_call() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::default();
    let coordinator = coordinator(&service, &temp);

    let mut record = PuzzleRecord {
        question_part1: "Q1".to_string(),
        question_part2: Some("Q2".to_string()),
        input: "x".to_string(),
        ..Default::default()
    };
    record.mark_solved(Part::Two, Some("7".to_string()));
    coordinator.cache().put(identity(), &record).unwrap();

    let err = coordinator.submit(identity(), None, "99").unwrap_err();

    assert!(matches!(err, PuzzleError::AlreadyComplete(id) if id == identity()));
    assert_eq!(service.scrapes(), 0);
    assert!(service.attempts().is_empty());
}

#[test]
fn incorrect_answer_leaves_cache_untouched() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Incorrect {
        hint: Some(AnswerHint::TooHigh),
    })]);
    let coordinator = coordinator(&service, &temp);

    let before = coordinator.get(identity()).unwrap();
    let outcome = coordinator.submit(identity(), None, "100").unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            part: Part::One,
            hint: Some(AnswerHint::TooHigh)
        }
    );
    assert_eq!(coordinator.cache().get(identity()).unwrap(), Some(before));
}

#[test]
fn rate_limit_is_reported_with_wait() {
    let temp = TempDir::new().unwrap();
    let wait = Some(Duration::from_secs(42));
    let service = FakeService::with_verdicts([Ok(Verdict::RateLimited { wait })]);
    let coordinator = coordinator(&service, &temp);

    let outcome = coordinator.submit(identity(), None, "1").unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Throttled {
            part: Part::One,
            wait
        }
    );
    assert_eq!(service.attempts().len(), 1);
    let cached = coordinator.cache().get(identity()).unwrap().unwrap();
    assert!(cached.solved.is_empty());
}

#[test]
fn transport_error_is_surfaced_and_not_retried() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Err(TransportError::new("connection reset"))]);
    let coordinator = coordinator(&service, &temp);

    let err = coordinator.submit(identity(), None, "1").unwrap_err();

    assert!(matches!(err, PuzzleError::Transport(ref e) if e.message() == "connection reset"));
    assert_eq!(service.attempts().len(), 1);
}

#[test]
fn already_solved_syncs_local_state() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::AlreadySolved)]);
    let coordinator = coordinator(&service, &temp);
    coordinator.get(identity()).unwrap();

    // The service knows part 1 is done, the local cache does not
    service.state.borrow_mut().solved.insert(Part::One);
    let outcome = coordinator.submit(identity(), None, "41").unwrap();

    let SubmitOutcome::Accepted {
        part,
        refreshed,
        record,
    } = outcome
    else {
        panic!("Expected Accepted");
    };
    assert_eq!(part, Part::One);
    assert!(refreshed);
    assert!(record.is_solved(Part::One));
    // The real answer comes from the refreshed page, not the submitted guess
    assert_eq!(record.answer_part1.as_deref(), Some("42"));
}

#[test]
fn explicit_part_skips_selection() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct)]);
    service.state.borrow_mut().solved.insert(Part::One);
    let coordinator = coordinator(&service, &temp);

    let outcome = coordinator.submit(identity(), Some(Part::Two), " 7 \n").unwrap();

    let attempts = service.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].part, Part::Two);
    assert_eq!(attempts[0].answer, "7");
    assert!(matches!(outcome, SubmitOutcome::Accepted { part: Part::Two, .. }));
    let cached = coordinator.cache().get(identity()).unwrap().unwrap();
    assert!(cached.is_complete());
    assert_eq!(cached.answer_part2.as_deref(), Some("7"));
}

#[test]
fn wrong_level_for_locked_part_two_leaves_progress_untouched() {
    let temp = TempDir::new().unwrap();
    // The service answers a part 2 submission this way while part 1 is open
    let service = FakeService::with_verdicts([Ok(Verdict::AlreadySolved)]);
    let coordinator = coordinator(&service, &temp);

    let err = coordinator
        .submit(identity(), Some(Part::Two), "5")
        .unwrap_err();

    assert!(matches!(
        err,
        PuzzleError::PartLocked { identity: id, part: Part::Two } if id == identity()
    ));
    let cached = coordinator.cache().get(identity()).unwrap().unwrap();
    assert!(cached.solved.is_empty());
    assert!(coordinator.view(identity(), true).unwrap().solved.is_empty());

    // The next unqualified submission still goes to part 1
    let outcome = coordinator.submit(identity(), None, "41").unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rejected { part: Part::One, .. }));
}

#[test]
fn already_solved_part_two_with_part_one_done_completes_puzzle() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct), Ok(Verdict::AlreadySolved)]);
    let coordinator = coordinator(&service, &temp);
    coordinator.submit(identity(), None, "42").unwrap();

    let outcome = coordinator.submit(identity(), Some(Part::Two), "1337").unwrap();

    let SubmitOutcome::Accepted { part, record, .. } = outcome else {
        panic!("Expected Accepted");
    };
    assert_eq!(part, Part::Two);
    assert!(record.is_complete());
    assert!(record.answer_part2.is_none());
}

#[test]
fn already_solved_part_two_is_confirmed_by_the_page() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::AlreadySolved)]);
    let coordinator = coordinator(&service, &temp);
    coordinator.get(identity()).unwrap();

    // Solved elsewhere, the local cache knows nothing about it
    service.state.borrow_mut().solved.extend(Part::ALL);
    let outcome = coordinator.submit(identity(), Some(Part::Two), "1337").unwrap();

    let SubmitOutcome::Accepted {
        part,
        refreshed,
        record,
    } = outcome
    else {
        panic!("Expected Accepted");
    };
    assert_eq!(part, Part::Two);
    assert!(refreshed);
    assert!(record.is_complete());
    assert_eq!(record.answer_part2.as_deref(), Some("1337"));
    // Cold fetch and the confirming refresh
    assert_eq!(service.scrapes(), 2);
}

#[test]
fn empty_answer_is_rejected_locally() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::default();
    let coordinator = coordinator(&service, &temp);

    let err = coordinator.submit(identity(), None, "   ").unwrap_err();

    assert!(matches!(err, PuzzleError::EmptyAnswer));
    assert_eq!(service.scrapes(), 0);
    assert!(service.attempts().is_empty());
}

#[test]
fn refresh_retries_until_part_two_is_disclosed() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct)]);
    service.state.borrow_mut().stale_scrapes = 2;
    let coordinator = coordinator(&service, &temp);

    let outcome = coordinator.submit(identity(), None, "42").unwrap();

    assert!(matches!(outcome, SubmitOutcome::Accepted { refreshed: true, .. }));
    // Cold fetch, two stale refreshes, one good refresh
    assert_eq!(service.scrapes(), 4);
}

#[test]
fn refresh_gives_up_after_configured_attempts() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct)]);
    service.state.borrow_mut().stale_scrapes = 10;
    let coordinator = Coordinator::new(&service, PuzzleCache::new(temp.path()))
        .with_refresh_policy(no_backoff(2));

    let outcome = coordinator.submit(identity(), None, "42").unwrap();

    let SubmitOutcome::Accepted {
        refreshed, record, ..
    } = outcome
    else {
        panic!("Expected Accepted");
    };
    assert!(!refreshed);
    assert!(record.is_solved(Part::One));
    assert_eq!(service.scrapes(), 3);
}

#[test]
fn failed_refresh_keeps_the_accepted_answer() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::with_verdicts([Ok(Verdict::Correct)]);
    let coordinator = coordinator(&service, &temp);
    coordinator.get(identity()).unwrap();

    service.state.borrow_mut().fail_scrapes = true;
    let outcome = coordinator.submit(identity(), None, "42").unwrap();

    assert!(matches!(
        outcome,
        SubmitOutcome::Accepted {
            part: Part::One,
            refreshed: false,
            ..
        }
    ));
    let cached = coordinator.cache().get(identity()).unwrap().unwrap();
    assert_eq!(cached.answer_part1.as_deref(), Some("42"));
}

#[test]
fn get_and_view_work_offline_once_cached() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::default();
    let coordinator = coordinator(&service, &temp);

    let fetched = coordinator.get(identity()).unwrap();
    service.state.borrow_mut().fail_scrapes = true;

    assert_eq!(coordinator.get(identity()).unwrap(), fetched);
    assert_eq!(coordinator.view(identity(), false).unwrap(), fetched);
    assert!(matches!(
        coordinator.view(identity(), true),
        Err(PuzzleError::Transport(ref e)) if e.timed_out()
    ));
    assert_eq!(service.scrapes(), 2);
}

#[test]
fn latest_is_resolved_through_the_gateway() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::default();
    let coordinator = coordinator(&service, &temp);

    let resolution = resolve(None, Some(DaySpec::Latest), Path::new("/tmp")).unwrap();
    assert_eq!(coordinator.resolve(resolution).unwrap(), identity());

    let err = coordinator
        .resolve(Resolution::Latest { year: Some(2030) })
        .unwrap_err();
    assert!(matches!(err, PuzzleError::Identity(_)));
}

#[derive(Debug, Clone)]
enum Step {
    Submit(Option<Part>, Verdict),
    Fail(Option<Part>),
}

fn verdict() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        Just(Verdict::Correct),
        Just(Verdict::AlreadySolved),
        Just(Verdict::Incorrect { hint: None }),
        Just(Verdict::RateLimited { wait: None }),
    ]
}

fn part() -> impl Strategy<Value = Option<Part>> {
    prop_oneof![Just(None), Just(Some(Part::One)), Just(Some(Part::Two))]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (part(), verdict()).prop_map(|(p, v)| Step::Submit(p, v)),
        1 => part().prop_map(Step::Fail),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever the service answers, the cached record stays consistent and
    /// solved parts are never lost.
    #[test]
    fn prop_invariants_hold_for_any_verdict_sequence(steps in prop::collection::vec(step(), 1..8)) {
        let temp = TempDir::new().unwrap();
        let service = FakeService::default();
        let coordinator = coordinator(&service, &temp);
        let mut solved_so_far = BTreeSet::new();

        for step in steps {
            let (part, verdict) = match step {
                Step::Submit(part, verdict) => (part, Ok(verdict)),
                Step::Fail(part) => (part, Err(TransportError::new("down"))),
            };
            service.state.borrow_mut().verdicts.push_back(verdict);
            let _ = coordinator.submit(identity(), part, "17");

            if let Some(record) = coordinator.cache().get(identity()).unwrap() {
                prop_assert!(record.validate().is_ok());
                prop_assert!(!record.is_solved(Part::Two) || record.is_solved(Part::One));
                prop_assert!(record.solved.is_superset(&solved_so_far));
                solved_so_far = record.solved.clone();
            }
        }
    }
}
