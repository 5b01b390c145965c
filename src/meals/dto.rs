use serde::Deserialize;

use super::repo::NewMeal;
use crate::{
    error::AppResult,
    forms::{non_negative, required_text},
};

#[derive(Debug, Default, Deserialize)]
pub struct MealForm {
    pub food: Option<String>,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fats: Option<String>,
}

impl MealForm {
    pub fn validate(self) -> AppResult<NewMeal> {
        Ok(NewMeal {
            food: required_text("food", self.food.as_deref())?,
            calories: non_negative("calories", self.calories.as_deref())?,
            protein: non_negative("protein", self.protein.as_deref())?,
            carbs: non_negative("carbs", self.carbs.as_deref())?,
            fats: non_negative("fats", self.fats.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rice_validates() {
        let form = MealForm {
            food: Some("Rice".into()),
            calories: Some("200".into()),
            protein: Some("4".into()),
            carbs: Some("45".into()),
            fats: Some("1".into()),
        };
        assert_eq!(
            form.validate().unwrap(),
            NewMeal {
                food: "Rice".into(),
                calories: 200,
                protein: 4,
                carbs: 45,
                fats: 1,
            }
        );
    }

    #[test]
    fn missing_macro_is_reported_by_name() {
        let form = MealForm {
            food: Some("Rice".into()),
            calories: Some("200".into()),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().to_string().contains("protein"));
    }
}
