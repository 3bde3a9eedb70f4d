#[cfg(test)]
mod tests {
    use fitola_memory::ContextEntry;
    use fitola_prompt::{FitnessPromptEngine, Fields, SYSTEM_ROLE};
    use serde_json::{Value, json};

    fn map(v: Value) -> Fields {
        v.as_object().cloned().unwrap_or_default()
    }

    fn entry(workflow: &str) -> ContextEntry {
        ContextEntry {
            timestamp: "2026-03-01T08:00:00+00:00".into(),
            workflow: workflow.into(),
            context: json!({}),
            parameters: json!({}),
        }
    }

    // ── Fitness plan ───────────────────────────────────────────

    #[test]
    fn test_fitness_plan_defaults() {
        let prompt = FitnessPromptEngine::new().fitness_plan(&Fields::new(), &Fields::new(), &[]);
        assert!(prompt.starts_with(SYSTEM_ROLE));
        assert!(prompt.contains("- Age: 30 years (Adult)"));
        assert!(prompt.contains("- Physical Stats: 70kg, 170cm"));
        assert!(prompt.contains("- Body Type: Mesomorph"));
        assert!(prompt.contains("- Available Equipment: Basic (Dumbbells, Resistance Bands)"));
        assert!(prompt.contains("## FITNESS GOALS\n  • General Fitness"));
        assert!(prompt.contains("30-day fitness plan"));
        assert!(prompt.contains("**Week 1-4:**"));
        assert!(!prompt.contains("INTERACTION HISTORY"));
    }

    #[test]
    fn test_fitness_plan_context_over_params() {
        let ctx = map(json!({"age": 45, "goals": ["Lose fat", "Run 10k"]}));
        let params = map(json!({"age": 20, "weight": 82, "duration_days": 14}));
        let prompt = FitnessPromptEngine::new().fitness_plan(&ctx, &params, &[entry("fitness_plan")]);
        assert!(prompt.contains("- Age: 45 years"));
        assert!(prompt.contains("82kg"));
        assert!(prompt.contains("  • Lose fat\n  • Run 10k"));
        assert!(prompt.contains("**Week 1-2:**"));
        assert!(prompt.contains("## INTERACTION HISTORY (Recent Context)\n1. [2026-03-01T08:00:00+00:00] fitness_plan"));
    }

    // ── Nutrition plan ─────────────────────────────────────────

    #[test]
    fn test_nutrition_plan_embeds_calories() {
        let ctx = map(json!({"age": 25, "weight": 60, "height": 165, "city": "Lagos"}));
        let prompt = FitnessPromptEngine::new().nutrition_plan(&ctx, &Fields::new(), &[]);
        // 10*60 + 6.25*165 - 5*25 + 5 = 1511.25; * 1.5 = 2266.875
        assert!(prompt.contains("~1511 kcal/day"));
        assert!(prompt.contains("~2266 kcal/day"));
        assert!(prompt.contains("ingredients available in Lagos"));
        assert!(prompt.contains("- Allergies/Restrictions: None"));
        assert!(prompt.contains("Strictly avoid N/A"));
        assert!(prompt.contains("### 7-Day Meal Plan"));
        assert!(prompt.contains("  • Weight Management"));
    }

    #[test]
    fn test_nutrition_plan_allergies() {
        let ctx = map(json!({"allergies": ["peanuts", "shellfish"]}));
        let params = map(json!({"dietary_preference": "Vegetarian"}));
        let prompt = FitnessPromptEngine::new().nutrition_plan(&ctx, &params, &[]);
        assert!(prompt.contains("Strictly avoid peanuts, shellfish"));
        assert!(prompt.contains("- Allergies/Restrictions:   • peanuts\n  • shellfish"));
        assert!(prompt.contains("- Dietary Preference: Vegetarian"));
    }

    // ── Chat / goal / motivation ───────────────────────────────

    #[test]
    fn test_chat_prompt_history_limit_five() {
        let history: Vec<ContextEntry> = (0..7).map(|i| entry(&format!("wf{i}"))).collect();
        let prompt = FitnessPromptEngine::new().chat(&Fields::new(), "How do I squat?", &history);
        assert!(prompt.contains("## USER MESSAGE\nHow do I squat?"));
        assert!(prompt.contains("Limited profile information available"));
        assert!(prompt.contains("5. [2026-03-01T08:00:00+00:00] wf6"));
        assert!(!prompt.contains("wf1"));
    }

    #[test]
    fn test_goal_tracking_prompt_pretty_prints_progress() {
        let params = map(json!({
            "goal": "Bench 100kg",
            "days_elapsed": 21,
            "current_progress": {"bench_kg": 85}
        }));
        let prompt = FitnessPromptEngine::new().goal_tracking(&Fields::new(), &params, &[]);
        assert!(prompt.contains("## GOAL BEING TRACKED\nBench 100kg"));
        assert!(prompt.contains("## TIME ELAPSED\n21 days"));
        assert!(prompt.contains("{\n  \"bench_kg\": 85\n}"));
    }

    #[test]
    fn test_motivation_prompt_defaults() {
        let prompt = FitnessPromptEngine::new().motivation(&Fields::new(), &Fields::new(), &[]);
        assert!(prompt.contains("## CURRENT SITUATION\ngeneral"));
        assert!(prompt.contains("## USER MOOD/STATE\nneutral"));
    }

    // ── Adaptive appendices ────────────────────────────────────

    #[test]
    fn test_adaptive_appendices() {
        let engine = FitnessPromptEngine::new();
        let fitness = engine.adaptive_fitness_plan(
            &Fields::new(),
            &Fields::new(),
            &["Consistent workout history detected".into()],
            &["Plan complexity adjusted for experience level".into()],
        );
        assert!(fitness.contains("## ADAPTIVE ELEMENTS (Based on Learning)"));
        assert!(fitness.contains("The user has shown:\n- Consistent workout history detected"));

        let nutrition = engine.adaptive_nutrition_plan(
            &Fields::new(),
            &Fields::new(),
            0.75,
            &["breakfast_smoothie".into()],
            &["late_evening".into()],
        );
        assert!(nutrition.contains("Historical compliance rate: 75.0%"));
        assert!(nutrition.contains("- Complex preparations during late_evening"));
    }
}
