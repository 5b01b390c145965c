use serde::Deserialize;

use super::repo::NewWorkout;
use crate::{
    error::AppResult,
    forms::{non_negative, required_text},
};

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutForm {
    pub exercise: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
}

impl WorkoutForm {
    pub fn validate(self) -> AppResult<NewWorkout> {
        Ok(NewWorkout {
            exercise: required_text("exercise", self.exercise.as_deref())?,
            sets: non_negative("sets", self.sets.as_deref())?,
            reps: non_negative("reps", self.reps.as_deref())?,
            weight: non_negative("weight", self.weight.as_deref())?,
        })
    }
}
