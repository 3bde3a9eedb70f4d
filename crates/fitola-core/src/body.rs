//! Fixed body-composition and energy formulas.

use serde::{Deserialize, Serialize};

/// Activity multiplier applied to BMR for a moderately active user.
pub const MODERATE_ACTIVITY_FACTOR: f64 = 1.5;

/// WHO adult BMI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body mass index from weight in kilograms and height in centimetres.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Mifflin-St Jeor basal metabolic rate, male constant (+5).
///
/// There is no sex field on the profile, so the female constant (-161) is never applied.
pub fn mifflin_st_jeor_bmr(weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + 5.0
}

/// Total daily energy expenditure at moderate activity, truncated to whole kcal.
pub fn tdee(bmr: f64) -> i64 {
    (bmr * MODERATE_ACTIVITY_FACTOR) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_formula() {
        let value = bmi(70.0, 175.0);
        assert!((value - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_bmr_reference_value() {
        // 10*75 + 6.25*180 - 5*30 + 5
        assert_eq!(mifflin_st_jeor_bmr(75.0, 180.0, 30.0), 1730.0);
        assert_eq!(tdee(1730.0), 2595);
    }
}
