use fitola_memory::ContextEntry;
use serde_json::Value;

use crate::fields::{Fields, as_list, lookup, number, param_or, present, render, text_or, truthy};

/// Coach persona prepended to every workflow prompt.
pub const SYSTEM_ROLE: &str = "You are an expert AI fitness coach and nutritionist with deep knowledge in:
- Exercise science and biomechanics
- Nutrition and dietary planning
- Goal setting and motivation psychology
- Different body types and their specific needs
- Age-appropriate fitness strategies
- Injury prevention and safe training practices

You provide personalized, actionable, and safe advice tailored to each individual's profile.";

/// Builds the instructional prompts for each coaching workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessPromptEngine;

impl FitnessPromptEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn fitness_plan(&self, ctx: &Fields, params: &Fields, history: &[ContextEntry]) -> String {
        let age = text_or(ctx, params, "age", "30");
        let age_group = text_or(ctx, params, "age_group", "Adult");
        let weight = text_or(ctx, params, "weight", "70");
        let height = text_or(ctx, params, "height", "170");
        let body_type = text_or(ctx, params, "body_type", "Mesomorph");
        let goals = goals_or(ctx, params, "General Fitness");
        let duration_days = present(params, "duration_days")
            .and_then(number)
            .map_or(30, |d| d as i64);
        let experience_level = param_or(params, "experience_level", "Intermediate");
        let equipment = param_or(params, "equipment", "Basic (Dumbbells, Resistance Bands)");
        let limitations = param_or(params, "limitations", "None");
        let history_context = history_context(history, 3);
        let weeks = duration_days.div_euclid(7);

        format!(
            "{SYSTEM_ROLE}

## USER PROFILE
- Age: {age} years ({age_group})
- Physical Stats: {weight}kg, {height}cm
- Body Type: {body_type}
- Experience Level: {experience_level}
- Available Equipment: {equipment}
- Physical Limitations: {limitations}

## FITNESS GOALS
{goals}

## PLAN DURATION
{duration_days} days

{history_context}

## TASK
Create a comprehensive, personalized {duration_days}-day fitness plan that:

1. **Progression**: Start at appropriate intensity and progressively increase
2. **Safety First**: Consider age, limitations, and experience level
3. **Goal-Oriented**: Directly target the specified fitness goals
4. **Practical**: Use available equipment and realistic time commitments
5. **Recovery**: Include proper rest days and recovery guidance
6. **Variety**: Mix different training modalities to prevent boredom

## OUTPUT FORMAT
Please structure your response as follows:

### Overview
[Brief summary of the plan philosophy and expected outcomes]

### Weekly Breakdown
**Week 1-{weeks}:**

**Day 1: [Focus Area]**
- Warm-up: [5-10 minutes]
- Main Workout:
  * Exercise 1: [Name] - [Sets] x [Reps] - [Rest] - [Notes]
  * Exercise 2: [Name] - [Sets] x [Reps] - [Rest] - [Notes]
  * Exercise 3: [Name] - [Sets] x [Reps] - [Rest] - [Notes]
- Cool-down: [5-10 minutes]
- Estimated Duration: [X minutes]

[Continue for all days]

### Recovery Days
[Specify active recovery activities]

### Progress Tracking
[Key metrics to track progress]

### Safety Reminders
[Important precautions specific to this user]

### Progression Guidelines
[How to advance when ready]

Remember: Safety and gradual progression are paramount. Include proper form cues and listen-to-your-body reminders."
        )
    }

    pub fn nutrition_plan(&self, ctx: &Fields, params: &Fields, history: &[ContextEntry]) -> String {
        let age = lookup(ctx, params, "age").cloned().unwrap_or(Value::from(30));
        let weight = lookup(ctx, params, "weight").cloned().unwrap_or(Value::from(70));
        let height = lookup(ctx, params, "height").cloned().unwrap_or(Value::from(170));
        let goals = goals_or(ctx, params, "Weight Management");
        let city = text_or(ctx, params, "city", "General");
        let allergies: Vec<String> = lookup(ctx, params, "allergies")
            .filter(|v| truthy(v))
            .map(as_list)
            .unwrap_or_default();
        let dietary_preference = param_or(params, "dietary_preference", "No restrictions");
        let duration_days = param_or(params, "duration_days", "7");
        let history_context = history_context(history, 3);

        let (bmr, tdee) = calorie_needs(&weight, &height, &age);

        let allergy_list = if allergies.is_empty() {
            "None".to_string()
        } else {
            format_list(&allergies)
        };
        let allergy_avoid = if allergies.is_empty() {
            "N/A".to_string()
        } else {
            allergies.join(", ")
        };
        let age = render(&age);
        let weight = render(&weight);
        let height = render(&height);

        format!(
            "{SYSTEM_ROLE}

## USER PROFILE
- Age: {age} years
- Physical Stats: {weight}kg, {height}cm
- Location: {city}
- Dietary Preference: {dietary_preference}
- Allergies/Restrictions: {allergy_list}

## NUTRITIONAL GOALS
{goals}

## CALCULATED NEEDS
- Basal Metabolic Rate (BMR): ~{bmr} kcal/day
- Total Daily Energy Expenditure (TDEE): ~{tdee} kcal/day
- Recommended Calorie Target: Adjust based on goals

{history_context}

## TASK
Create a {duration_days}-day personalized nutrition plan that:

1. **Goal-Aligned**: Support the specified nutritional goals
2. **Locally Sourced**: Use ingredients available in {city} when possible
3. **Balanced**: Include all macronutrients and micronutrients
4. **Practical**: Easy to prepare, realistic portions
5. **Allergy-Safe**: Strictly avoid {allergy_avoid}
6. **Sustainable**: Not overly restrictive, enjoyable foods

## OUTPUT FORMAT

### Daily Calorie Target
[Specify based on goals: maintenance/deficit/surplus]

### Macronutrient Split
- Protein: [X]g ([Y]%)
- Carbohydrates: [X]g ([Y]%)
- Fats: [X]g ([Y]%)

### {duration_days}-Day Meal Plan

**Day 1**

🌅 **Breakfast** (Time: 7-9 AM)
- Meal: [Detailed description]
- Calories: ~[X] kcal
- Protein: [X]g | Carbs: [X]g | Fats: [X]g
- Prep time: [X] minutes

☀️ **Mid-Morning Snack** (Time: 10-11 AM)
- Snack: [Description]
- Calories: ~[X] kcal

🌤️ **Lunch** (Time: 12-2 PM)
- Meal: [Detailed description]
- Calories: ~[X] kcal
- Protein: [X]g | Carbs: [X]g | Fats: [X]g
- Prep time: [X] minutes

🌙 **Evening Snack** (Time: 4-5 PM)
- Snack: [Description]
- Calories: ~[X] kcal

🌃 **Dinner** (Time: 7-9 PM)
- Meal: [Detailed description]
- Calories: ~[X] kcal
- Protein: [X]g | Carbs: [X]g | Fats: [X]g
- Prep time: [X] minutes

**Daily Total:** ~[X] kcal

[Continue for all {duration_days} days]

### Hydration Guidelines
[Water intake recommendations]

### Meal Prep Tips
[Time-saving strategies]

### Supplement Recommendations (Optional)
[If beneficial for goals]

### Shopping List
[Organized by category for the week]

Remember: This plan should be flexible. Listen to your body and adjust portions as needed."
        )
    }

    pub fn chat(&self, ctx: &Fields, message: &str, history: &[ContextEntry]) -> String {
        let history_context = history_context(history, 5);
        let user_info = user_summary(ctx);

        format!(
            "{SYSTEM_ROLE}

## CURRENT USER
{user_info}

{history_context}

## USER MESSAGE
{message}

## INSTRUCTIONS
Provide a helpful, personalized response that:
1. Addresses the user's specific question or concern
2. Considers their fitness level, goals, and context
3. Offers actionable advice
4. Is encouraging and motivating
5. Includes safety reminders when relevant
6. Keeps responses concise yet comprehensive (2-4 paragraphs)

Be conversational, empathetic, and supportive. You're not just an AI - you're their dedicated fitness coach."
        )
    }

    pub fn goal_tracking(&self, ctx: &Fields, params: &Fields, history: &[ContextEntry]) -> String {
        let current_progress = present(params, "current_progress")
            .cloned()
            .unwrap_or_else(|| Value::Object(Fields::new()));
        let current_progress =
            serde_json::to_string_pretty(&current_progress).unwrap_or_else(|_| "{}".into());
        let goal = param_or(params, "goal", "fitness improvement");
        let time_elapsed = param_or(params, "days_elapsed", "0");
        let history_context = history_context(history, 3);
        let user_info = user_summary(ctx);

        format!(
            "{SYSTEM_ROLE}

## USER PROFILE
{user_info}

{history_context}

## GOAL BEING TRACKED
{goal}

## TIME ELAPSED
{time_elapsed} days

## CURRENT PROGRESS
{current_progress}

## TASK
Analyze the user's progress and provide:

1. **Progress Assessment**: How are they doing relative to their goal?
2. **Achievements**: Celebrate wins, big and small
3. **Areas for Improvement**: Constructive feedback
4. **Adjusted Recommendations**: Any changes to their plan based on progress
5. **Motivation Boost**: Encouraging words tailored to their journey
6. **Next Milestones**: Clear next targets to aim for

Keep the tone positive, data-driven, and action-oriented."
        )
    }

    pub fn motivation(&self, ctx: &Fields, params: &Fields, history: &[ContextEntry]) -> String {
        let situation = param_or(params, "situation", "general");
        let mood = param_or(params, "mood", "neutral");
        let history_context = history_context(history, 3);
        let user_info = user_summary(ctx);

        format!(
            "{SYSTEM_ROLE}

## USER PROFILE
{user_info}

{history_context}

## CURRENT SITUATION
{situation}

## USER MOOD/STATE
{mood}

## TASK
Provide personalized motivational support that:

1. **Acknowledges** their current feelings or situation
2. **Reminds** them of their goals and why they started
3. **Reframes** challenges as opportunities
4. **Provides** specific, actionable next steps
5. **Inspires** with relevant wisdom or encouragement
6. **Reassures** that setbacks are part of the journey

Keep it genuine, personal, and powerful. This should feel like a pep talk from a coach who really knows and cares about them. Use specific details from their profile to make it personal.

Length: 2-3 paragraphs that pack an emotional punch."
        )
    }

    /// Fitness prompt with the learned-pattern appendix used by adaptive plans.
    pub fn adaptive_fitness_plan(
        &self,
        ctx: &Fields,
        params: &Fields,
        patterns: &[String],
        adaptations: &[String],
    ) -> String {
        format!(
            "{}

## ADAPTIVE ELEMENTS (Based on Learning)
The user has shown:
{}

Adaptations to make:
{}

Generate a plan that incorporates these learned insights.",
            self.fitness_plan(ctx, params, &[]),
            dash_list(patterns),
            dash_list(adaptations),
        )
    }

    /// Nutrition prompt with the compliance appendix used by adaptive plans.
    pub fn adaptive_nutrition_plan(
        &self,
        ctx: &Fields,
        params: &Fields,
        compliance_rate: f64,
        preferred_meals: &[String],
        difficult_times: &[String],
    ) -> String {
        format!(
            "{}

## COMPLIANCE-BASED ADAPTATIONS
Historical compliance rate: {:?}%

Include primarily:
{}

Avoid:
- Complex preparations during {}
- Meals user has shown low compliance with

Focus on realistic, enjoyable meals that the user will actually follow.",
            self.nutrition_plan(ctx, params, &[]),
            compliance_rate * 100.0,
            dash_list(preferred_meals),
            difficult_times.join(", "),
        )
    }
}

/// BMR (truncated) and TDEE from the Mifflin-St Jeor formula. Non-numeric
/// inputs fall back to the default profile (70 kg, 170 cm, 30 years).
pub fn calorie_needs(weight: &Value, height: &Value, age: &Value) -> (i64, i64) {
    let bmr = fitola_core::mifflin_st_jeor_bmr(
        number(weight).unwrap_or(70.0),
        number(height).unwrap_or(170.0),
        number(age).unwrap_or(30.0),
    );
    (bmr as i64, fitola_core::tdee(bmr))
}

fn goals_or(ctx: &Fields, params: &Fields, default: &str) -> String {
    let goals = lookup(ctx, params, "goals")
        .map(as_list)
        .unwrap_or_else(|| vec![default.to_string()]);
    format_list(&goals)
}

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        return "None specified".into();
    }
    items
        .iter()
        .map(|item| format!("  • {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn dash_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn history_context(history: &[ContextEntry], limit: usize) -> String {
    if history.is_empty() {
        return String::new();
    }
    let skip = history.len().saturating_sub(limit);
    let mut lines = vec!["## INTERACTION HISTORY (Recent Context)".to_string()];
    for (idx, entry) in history.iter().skip(skip).enumerate() {
        lines.push(format!("{}. [{}] {}", idx + 1, entry.timestamp, entry.workflow));
    }
    lines.join("\n")
}

fn user_summary(ctx: &Fields) -> String {
    let mut lines = Vec::new();

    if ctx.contains_key("age") || ctx.contains_key("age_group") {
        let age = ctx.get("age").filter(|v| truthy(v)).map(render);
        let age_group = ctx.get("age_group").map(render).unwrap_or_default();
        lines.push(match age {
            Some(age) => format!("- Age: {age} ({age_group})"),
            None => format!("- Age Group: {age_group}"),
        });
    }

    if let (Some(w), Some(h)) = (ctx.get("weight"), ctx.get("height")) {
        lines.push(format!("- Stats: {}kg, {}cm", render(w), render(h)));
    }

    if let Some(body_type) = ctx.get("body_type") {
        lines.push(format!("- Body Type: {}", render(body_type)));
    }

    if let Some(goals) = ctx.get("goals") {
        lines.push(format!("- Goals: {}", format_list(&as_list(goals))));
    }

    if lines.is_empty() {
        "Limited profile information available".into()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Fields {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_history_context_last_n() {
        let history: Vec<ContextEntry> = (0..6)
            .map(|i| ContextEntry {
                timestamp: format!("t{i}"),
                workflow: format!("wf{i}"),
                context: json!({}),
                parameters: json!({}),
            })
            .collect();
        let ctx = history_context(&history, 3);
        assert_eq!(
            ctx,
            "## INTERACTION HISTORY (Recent Context)\n1. [t3] wf3\n2. [t4] wf4\n3. [t5] wf5"
        );
        assert_eq!(history_context(&[], 3), "");
    }

    #[test]
    fn test_user_summary_variants() {
        assert_eq!(
            user_summary(&Fields::new()),
            "Limited profile information available"
        );
        assert_eq!(
            user_summary(&map(json!({"age_group": "Teen"}))),
            "- Age Group: Teen"
        );
        let full = user_summary(&map(json!({
            "age": 28, "age_group": "Adult", "weight": 65, "height": 168,
            "body_type": "Ectomorph", "goals": "Build muscle"
        })));
        assert_eq!(
            full,
            "- Age: 28 (Adult)\n- Stats: 65kg, 168cm\n- Body Type: Ectomorph\n- Goals:   • Build muscle"
        );
    }

    #[test]
    fn test_calorie_needs() {
        // 10*70 + 6.25*170 - 5*30 + 5 = 1617.5
        let (bmr, tdee) = calorie_needs(&json!(70), &json!(170), &json!(30));
        assert_eq!(bmr, 1617);
        assert_eq!(tdee, 2426);
    }

    #[test]
    fn test_dash_list() {
        assert_eq!(dash_list(&["a".into(), "b".into()]), "- a\n- b");
        assert_eq!(dash_list(&[]), "");
    }
}
