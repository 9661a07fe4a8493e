use serde::{Deserialize, Serialize};

pub const CO2_PER_MEAL_KG: f64 = 2.5;
pub const WATER_PER_MEAL_LITERS: i64 = 1500;
pub const MONEY_PER_MEAL_INR: i64 = 50;

/// Environmental and budget savings for a number of replaced meals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactMetrics {
    pub meals: i64,
    pub co2_saved_kg: f64,
    pub water_saved_liters: i64,
    pub money_saved_inr: i64,
}

impl ImpactMetrics {
    pub fn for_meals(meals: i64) -> Self {
        Self {
            meals,
            co2_saved_kg: meals as f64 * CO2_PER_MEAL_KG,
            water_saved_liters: meals * WATER_PER_MEAL_LITERS,
            money_saved_inr: meals * MONEY_PER_MEAL_INR,
        }
    }
}

/// Share of the whole plan already swapped, in whole percent, capped at 100.
pub fn completion_percentage(total_meals_replaced: i64, baseline: i64, total_weeks: i64) -> i64 {
    let planned = baseline.saturating_mul(total_weeks);
    if planned <= 0 {
        return 0;
    }
    let percent = (total_meals_replaced as f64 / planned as f64 * 100.0).round() as i64;
    percent.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_scales_per_meal() {
        let impact = ImpactMetrics::for_meals(4);
        assert_eq!(impact.meals, 4);
        assert_eq!(impact.co2_saved_kg, 10.0);
        assert_eq!(impact.water_saved_liters, 6000);
        assert_eq!(impact.money_saved_inr, 200);

        assert_eq!(ImpactMetrics::for_meals(0).co2_saved_kg, 0.0);
    }

    #[test]
    fn completion_rounds_and_caps() {
        assert_eq!(completion_percentage(0, 7, 4), 0);
        assert_eq!(completion_percentage(1, 3, 1), 33);
        assert_eq!(completion_percentage(2, 3, 1), 67);
        assert_eq!(completion_percentage(1, 8, 1), 13);
        assert_eq!(completion_percentage(28, 7, 4), 100);
        assert_eq!(completion_percentage(90, 7, 4), 100);
    }

    #[test]
    fn completion_with_empty_plan_is_zero() {
        assert_eq!(completion_percentage(5, 0, 4), 0);
        assert_eq!(completion_percentage(5, 7, 0), 0);
    }
}
