use rand::rngs::StdRng;
use rand::SeedableRng;
use speculate2::speculate;
use studytrack::milestone::{self, Celebration, ENCOURAGEMENTS, GOAL_COMPLETED};
use studytrack::models::SubjectRecord;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

speculate! {
    describe "record operations" {
        it "record_solved increments by exactly one" {
            let mut record = SubjectRecord::with_goal(10);
            for expected in 1..=5 {
                record.record_solved();
                assert_eq!(record.solved, expected);
            }
        }

        it "accumulate_time adds positive deltas and ignores non-positive ones" {
            let mut record = SubjectRecord::with_goal(0);
            record.accumulate_time(10.5);
            record.accumulate_time(-3.0);
            record.accumulate_time(0.0);
            assert_eq!(record.time_seconds, 10.5);
        }

        it "set_goal clears milestone history even for the same goal value" {
            let mut record = SubjectRecord::with_goal(10);
            record.milestones_achieved.push(30);
            record.set_goal(10);
            assert!(record.milestones_achieved.is_empty());
            assert_eq!(record.goal, 10);
        }
    }

    describe "milestone_track" {
        it "uses the coarse track when a fifth of the goal fits in ten problems" {
            assert_eq!(milestone::milestone_track(50), &[30, 60, 90]);
            assert_eq!(milestone::milestone_track(40), &[30, 60, 90]);
        }

        it "uses the fine track for larger goals" {
            assert_eq!(milestone::milestone_track(100), &[20, 40, 60, 80]);
        }

        it "switches tracks just past the boundary" {
            assert_eq!(milestone::milestone_track(51), &[20, 40, 60, 80]);
        }
    }

    describe "evaluate" {
        it "stays inert without a goal" {
            let mut record = SubjectRecord::with_goal(0);
            let mut rng = seeded_rng();
            record.record_solved();
            assert!(milestone::evaluate(&mut record, &mut rng).is_none());
            assert!(record.milestones_achieved.is_empty());
        }

        it "fires milestone 30 exactly once on the increment that reaches it" {
            let mut record = SubjectRecord::with_goal(10);
            let mut rng = seeded_rng();

            for solved in 1..=2 {
                record.record_solved();
                assert_eq!(record.solved, solved);
                assert!(milestone::evaluate(&mut record, &mut rng).is_none());
            }

            record.record_solved(); // 3/10 = 30%
            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::Milestone { percent, .. }) => assert_eq!(percent, 30),
                other => panic!("expected milestone 30, got {:?}", other),
            }
            assert_eq!(record.milestones_achieved, vec![30]);

            record.record_solved(); // 4/10: next threshold is 60, nothing fires
            assert!(milestone::evaluate(&mut record, &mut rng).is_none());
        }

        it "fires at most one milestone per increment even across a jump" {
            let mut record = SubjectRecord::with_goal(10);
            let mut rng = seeded_rng();
            record.solved = 7; // 70%: both 30 and 60 are crossed

            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::Milestone { percent, .. }) => assert_eq!(percent, 30),
                other => panic!("expected milestone 30, got {:?}", other),
            }
            // the next evaluation picks up the next unfired threshold
            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::Milestone { percent, .. }) => assert_eq!(percent, 60),
                other => panic!("expected milestone 60, got {:?}", other),
            }
            assert_eq!(record.milestones_achieved, vec![30, 60]);
        }

        it "fires the completion event when solved lands exactly on the goal" {
            let mut record = SubjectRecord::with_goal(5);
            let mut rng = seeded_rng();
            let mut completed = 0;

            for _ in 0..5 {
                record.record_solved();
                if let Some(Celebration::GoalCompleted { .. }) =
                    milestone::evaluate(&mut record, &mut rng)
                {
                    completed += 1;
                }
            }
            assert_eq!(record.solved, 5);
            assert_eq!(completed, 1);
        }

        it "permanently suppresses milestones once the goal is reached" {
            let mut record = SubjectRecord::with_goal(5);
            let mut rng = seeded_rng();
            for _ in 0..5 {
                record.record_solved();
                milestone::evaluate(&mut record, &mut rng);
            }

            // past the goal now; nothing ever fires again for this record
            for _ in 0..10 {
                record.record_solved();
                assert!(milestone::evaluate(&mut record, &mut rng).is_none());
            }
        }

        it "resumes milestone tracking after set_goal" {
            let mut record = SubjectRecord::with_goal(5);
            let mut rng = seeded_rng();
            for _ in 0..6 {
                record.record_solved();
                milestone::evaluate(&mut record, &mut rng);
            }

            record.set_goal(20); // 6/20 = 30%, history cleared
            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::Milestone { percent, .. }) => assert_eq!(percent, 30),
                other => panic!("expected milestone 30, got {:?}", other),
            }
        }

        it "skips the completion event when solved is already past the goal" {
            let mut record = SubjectRecord::with_goal(5);
            let mut rng = seeded_rng();
            record.solved = 6;
            assert!(milestone::evaluate(&mut record, &mut rng).is_none());
        }

        it "picks messages from the known pools" {
            let mut rng = seeded_rng();

            let mut record = SubjectRecord::with_goal(10);
            record.solved = 3;
            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::Milestone { message, .. }) => {
                    assert!(ENCOURAGEMENTS.contains(&message));
                }
                other => panic!("expected a milestone, got {:?}", other),
            }

            let mut record = SubjectRecord::with_goal(3);
            record.solved = 3;
            match milestone::evaluate(&mut record, &mut rng) {
                Some(Celebration::GoalCompleted { message, .. }) => {
                    assert!(GOAL_COMPLETED.contains(&message));
                }
                other => panic!("expected a completion, got {:?}", other),
            }
        }
    }
}
