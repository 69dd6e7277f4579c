use std::collections::BTreeMap;

use speculate2::speculate;
use studytrack::config::Config;
use studytrack::store::{self, LogStore};

fn test_config(goals: &[(&str, u32)]) -> Config {
    let goals: BTreeMap<String, u32> = goals.iter().map(|(k, g)| (k.to_string(), *g)).collect();
    Config::from_goals(goals).expect("test config must not be empty")
}

speculate! {
    describe "persistence" {
        before {
            let dir = tempfile::tempdir().expect("Failed to create tempdir");
            let path = dir.path().join("study_log.json");
        }

        it "loads an empty map from a nonexistent path" {
            let data = store::load(&path);
            assert!(data.is_empty());
        }

        it "loads an empty map from an empty file" {
            std::fs::write(&path, "").expect("Failed to write");
            assert!(store::load(&path).is_empty());
        }

        it "loads an empty map from a corrupt file" {
            std::fs::write(&path, "{ this is not json").expect("Failed to write");
            assert!(store::load(&path).is_empty());
        }

        it "round-trips a store through save and load" {
            let config = test_config(&[("math", 50), ("english", 40)]);
            let mut log = LogStore::open(path.clone()).expect("Failed to open store");
            {
                let day = log.ensure_day("2024-01-01", &config);
                day.total_study_seconds = 123.5;
                let math = day.subjects.get_mut("math").expect("math record");
                math.record_solved();
                math.accumulate_time(45.25);
                math.milestones_achieved.push(30);
            }
            log.save().expect("Failed to save");

            let reloaded = store::load(&path);
            assert_eq!(&reloaded, log.data());
        }

        it "overwrites the previous contents on save" {
            let config = test_config(&[("math", 50)]);
            let mut log = LogStore::open(path.clone()).expect("Failed to open store");
            log.ensure_day("2024-01-01", &config);
            log.save().expect("Failed to save");
            log.ensure_day("2024-01-02", &config);
            log.save().expect("Failed to save");

            let reloaded = store::load(&path);
            assert_eq!(reloaded.len(), 2);
        }
    }

    describe "ensure_day" {
        it "creates a day with one zeroed record per configured subject" {
            let config = test_config(&[("math", 50), ("english", 40)]);
            let mut log = LogStore::in_memory();

            let day = log.ensure_day("2024-01-01", &config);
            assert_eq!(day.total_study_seconds, 0.0);
            assert_eq!(day.subjects.len(), 2);
            let math = &day.subjects["math"];
            assert_eq!(math.solved, 0);
            assert_eq!(math.goal, 50);
            assert_eq!(math.time_seconds, 0.0);
            assert!(math.milestones_achieved.is_empty());
        }

        it "is idempotent for identical config" {
            let config = test_config(&[("math", 50)]);
            let mut log = LogStore::in_memory();

            log.ensure_day("2024-01-01", &config);
            let first = log.data().clone();
            log.ensure_day("2024-01-01", &config);
            assert_eq!(&first, log.data());
        }

        it "backfills subjects added to the config later without touching existing data" {
            let old_config = test_config(&[("math", 50)]);
            let mut log = LogStore::in_memory();
            {
                let day = log.ensure_day("2024-01-01", &old_config);
                let math = day.subjects.get_mut("math").expect("math record");
                math.record_solved();
                math.set_goal(99);
            }

            let new_config = test_config(&[("math", 50), ("physics", 10)]);
            let day = log.ensure_day("2024-01-01", &new_config);
            assert_eq!(day.subjects.len(), 2);
            // existing record untouched by the backfill
            assert_eq!(day.subjects["math"].solved, 1);
            assert_eq!(day.subjects["math"].goal, 99);
            // new subject gets its default goal
            assert_eq!(day.subjects["physics"].goal, 10);
            assert_eq!(day.subjects["physics"].solved, 0);
        }

        it "produces the expected on-disk shape for a new day" {
            let config = test_config(&[("math", 50)]);
            let mut log = LogStore::in_memory();
            log.ensure_day("2024-01-01", &config);

            let value = serde_json::to_value(log.data()).expect("Failed to serialize");
            assert_eq!(
                value,
                serde_json::json!({
                    "2024-01-01": {
                        "total_study_seconds": 0.0,
                        "subjects": {
                            "math": {
                                "solved": 0,
                                "goal": 50,
                                "time_seconds": 0.0,
                                "milestones_achieved": []
                            }
                        }
                    }
                })
            );
        }
    }

    describe "date keys" {
        it "parses valid ISO dates" {
            assert!(store::parse_date_key("2024-01-31").is_some());
        }

        it "rejects malformed dates" {
            assert!(store::parse_date_key("01/31/2024").is_none());
            assert!(store::parse_date_key("2024-13-01").is_none());
            assert!(store::parse_date_key("yesterday").is_none());
        }
    }
}
