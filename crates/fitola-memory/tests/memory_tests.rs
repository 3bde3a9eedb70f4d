#[cfg(test)]
mod tests {
    use fitola_memory::*;
    use std::sync::Arc;
    use std::time::Duration;

    // ── Local manager ──────────────────────────────────────────

    mod local {
        use super::*;

        #[tokio::test]
        async fn test_memorize_then_retrieve() {
            let mem = MemoryManager::local_only();
            assert!(!mem.is_enabled());
            let ack = mem
                .memorize(
                    "u1",
                    "workout_completed",
                    &serde_json::json!({"exercise": "squat", "reps": 10}),
                    MemoryCategory::WorkoutHistory,
                )
                .await;
            assert_eq!(ack.task_id, "mock_1");
            assert_eq!(ack.status, "memorized_mock");

            let records = mem.retrieve("u1", "anything", None, 5).await;
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].interaction_type, "workout_completed");
            assert_eq!(records[0].content["reps"], 10);
            assert_eq!(records[0].category, MemoryCategory::WorkoutHistory);
            assert!(records[0].timestamp.is_some());
        }

        #[tokio::test]
        async fn test_learn_pattern_merges_data() {
            let mem = MemoryManager::local_only();
            let ack = mem
                .learn_pattern(
                    "u1",
                    PatternType::TimePreference,
                    serde_json::json!({"preferred_hour": 7}),
                )
                .await;
            assert_eq!(ack.category, MemoryCategory::Patterns);

            let patterns = mem
                .retrieve("u1", "", Some(MemoryCategory::Patterns), 5)
                .await;
            assert_eq!(patterns.len(), 1);
            let c = &patterns[0].content;
            assert_eq!(patterns[0].interaction_type, "pattern_learned");
            assert_eq!(c["pattern_type"], "time_preference");
            assert_eq!(c["preferred_hour"], 7);
            assert!(c["discovered_at"].is_string());
        }

        #[tokio::test]
        async fn test_suggestions_by_hour() {
            let mem = MemoryManager::local_only();
            let morning = mem.proactive_suggestions("u", 7).await;
            assert_eq!(morning.len(), 1);
            assert_eq!(morning[0].title, "Morning Workout");
            assert_eq!(morning[0].confidence, 0.8);

            let evening = mem.proactive_suggestions("u", 20).await;
            assert_eq!(evening[0].title, "Evening Exercise");
            assert_eq!(evening[0].kind, SuggestionKind::Workout);

            assert!(mem.proactive_suggestions("u", 13).await.is_empty());
            assert!(mem.proactive_suggestions("u", 10).await.is_empty());
        }

        #[tokio::test]
        async fn test_workout_patterns_become_insights_capped_at_three() {
            let mem = MemoryManager::local_only();
            for i in 0..4 {
                mem.learn_pattern(
                    "u",
                    PatternType::WorkoutPreference,
                    serde_json::json!({"note": format!("Workout variant {i}")}),
                )
                .await;
            }
            mem.learn_pattern(
                "u",
                PatternType::NutritionCompliance,
                serde_json::json!({"note": "skips breakfast"}),
            )
            .await;

            let suggestions = mem.proactive_suggestions("u", 7).await;
            assert_eq!(suggestions.len(), 3);
            assert_eq!(suggestions[0].kind, SuggestionKind::Workout);
            assert_eq!(suggestions[1].kind, SuggestionKind::Insight);
            assert_eq!(suggestions[1].title, "Detected Pattern");
            assert_eq!(suggestions[1].confidence, 0.6);
        }

        #[tokio::test]
        async fn test_goal_progress_trend() {
            let mem = MemoryManager::local_only();
            let first = mem
                .update_goal_progress("u", "Run 5k", &serde_json::json!({"km": 2}))
                .await;
            assert_eq!(first.trend, ProgressTrend::New);
            assert_eq!(first.history_count, 1);
            assert_eq!(
                first.adaptive_recommendation,
                "Stay consistent! Building habits takes time."
            );

            let second = mem
                .update_goal_progress("u", "Run 5k", &serde_json::json!({"km": 3}))
                .await;
            assert_eq!(second.trend, ProgressTrend::Improving);
            assert_eq!(second.current_progress["km"], 3);
            assert!(second.adaptive_recommendation.contains("10%"));
        }

        #[tokio::test]
        async fn test_write_count_covers_helper_writes() {
            let shared = Arc::new(std::sync::atomic::AtomicU64::new(0));
            let mem = MemoryManager::local_only().with_write_counter(shared.clone());
            mem.memorize("u", "x", &serde_json::json!({}), MemoryCategory::UserProfile)
                .await;
            mem.learn_pattern("u", PatternType::TimePreference, serde_json::json!({}))
                .await;
            mem.update_goal_progress("u", "Run 5k", &serde_json::json!({"km": 1}))
                .await;
            mem.retrieve("u", "q", None, 5).await;
            mem.proactive_suggestions("u", 7).await;

            assert_eq!(mem.write_count(), 3);
            assert_eq!(shared.load(std::sync::atomic::Ordering::Relaxed), 3);
        }

        #[test]
        fn test_suggestion_serializes_type_field() {
            let s = Suggestion {
                kind: SuggestionKind::Insight,
                title: "t".into(),
                reason: "r".into(),
                confidence: 0.5,
            };
            let v = serde_json::to_value(&s).unwrap();
            assert_eq!(v["type"], "insight");
        }
    }

    // ── MemU remote ────────────────────────────────────────────

    mod remote {
        use super::*;
        use wiremock::matchers::{body_partial_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn client(server: &MockServer) -> MemuClient {
            MemuClient::new(
                "memu-key".into(),
                server.uri(),
                "fitola_fitness_coach",
                Duration::from_secs(5),
            )
            .unwrap()
        }

        #[tokio::test]
        async fn test_memorize_posts_conversation() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/v3/memory/memorize"))
                .and(header("authorization", "Bearer memu-key"))
                .and(body_partial_json(serde_json::json!({
                    "user_id": "u1",
                    "agent_id": "fitola_fitness_coach",
                    "conversation": "User Action: goal_set\nDetails: {\"goal\":\"5k\"}"
                })))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"task_id": "task-42"})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let mem = MemoryManager::new(Some(Arc::new(client(&server))));
            assert!(mem.is_enabled());
            let ack = mem
                .memorize(
                    "u1",
                    "goal_set",
                    &serde_json::json!({"goal": "5k"}),
                    MemoryCategory::FitnessGoals,
                )
                .await;
            assert_eq!(ack.task_id, "task-42");
            assert_eq!(ack.status, "memorized");
            assert_eq!(ack.category, MemoryCategory::FitnessGoals);
        }

        #[tokio::test]
        async fn test_retrieve_maps_items() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/v3/memory/retrieve"))
                .and(body_partial_json(serde_json::json!({"agent_id": "fitola_fitness_coach"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "items": [
                        {"content": "Prefers morning workouts", "memory_type": "pattern", "created_at": "2026-01-01T07:00:00Z", "score": 0.92},
                        {"content": "Vegetarian", "memory_type": "preference"},
                        {"content": "extra", "memory_type": "x"}
                    ]
                })))
                .mount(&server)
                .await;

            let mem = MemoryManager::new(Some(Arc::new(client(&server))));
            let records = mem
                .retrieve("u1", "patterns", Some(MemoryCategory::Patterns), 2)
                .await;
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].content_text(), "Prefers morning workouts");
            assert_eq!(records[0].relevance, Some(0.92));
            assert_eq!(records[1].relevance, Some(1.0));
            assert_eq!(records[1].timestamp, None);
            assert_eq!(records[0].category, MemoryCategory::Patterns);

            let suggestions = mem.proactive_suggestions("u1", 13).await;
            assert_eq!(suggestions.len(), 1);
            assert_eq!(suggestions[0].confidence, 0.92);
        }

        #[tokio::test]
        async fn test_suggestions_issue_one_retrieve() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/v3/memory/retrieve"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let mem = MemoryManager::new(Some(Arc::new(client(&server))));
            let suggestions = mem.proactive_suggestions("u1", 18).await;
            assert_eq!(suggestions.len(), 1);
            assert_eq!(suggestions[0].title, "Evening Exercise");
        }

        #[tokio::test]
        async fn test_remote_failure_falls_back_to_local() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server)
                .await;

            let mem = MemoryManager::new(Some(Arc::new(client(&server))));
            let ack = mem
                .memorize("u1", "x", &serde_json::json!({}), MemoryCategory::UserProfile)
                .await;
            assert_eq!(ack.status, "memorized_mock");
            assert_eq!(mem.write_count(), 1);

            let records = mem.retrieve("u1", "q", None, 5).await;
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].interaction_type, "x");
        }
    }
}
