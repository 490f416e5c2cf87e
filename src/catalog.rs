//! Built-in workout library shared by the workout browser and the scheduler.

use crate::models::{Difficulty, WorkoutGoal};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Workout {
    pub id: u32,
    pub name: &'static str,
    pub goal: WorkoutGoal,
    /// Minutes.
    pub duration: u32,
    pub difficulty: Difficulty,
    pub exercises: &'static [&'static str],
    pub description: &'static str,
    pub video: &'static str,
}

pub static WORKOUTS: [Workout; 8] = [
    Workout {
        id: 1,
        name: "Yoga for Beginners",
        goal: WorkoutGoal::Flexibility,
        duration: 30,
        difficulty: Difficulty::Intermediate,
        exercises: &[
            "Cat&Cow",
            "Warrior Poses",
            "Low Lounge",
            "Triangle Pose",
            "Supine Twists",
            "Bridge Pose",
            "Child's Pose",
            "Savasana",
        ],
        description: "Gentle yoga sequence to improve flexibility and reduce stress.",
        video: "https://www.youtube.com/embed/6hZIzMpHl-c",
    },
    Workout {
        id: 2,
        name: "Core Crusher",
        goal: WorkoutGoal::Strength,
        duration: 10,
        difficulty: Difficulty::Intermediate,
        exercises: &[
            "Bicycle Crunches",
            "Toe Reach Crunch",
            "Reach Out Tuck-in",
            "Roll In",
            "Oblique Crunches",
            "Sitting Crunch",
            "Jack Knife",
        ],
        description: "Target your abdominal muscles with this intense core workout.",
        video: "https://www.youtube.com/embed/AnYl6Nk9GOA",
    },
    Workout {
        id: 3,
        name: "Full Body Burn",
        goal: WorkoutGoal::WeightLoss,
        duration: 20,
        difficulty: Difficulty::Intermediate,
        exercises: &[
            "Squat Jumps",
            "Jumping Jacks",
            "Plank Jacks",
            "Superman Pull",
            "Glute Bridge",
            "Reverse Plank",
            "Burpees",
        ],
        description: "Engage every muscle group with this challenging full-body workout.",
        video: "https://www.youtube.com/embed/UBMk30rjy0o",
    },
    Workout {
        id: 4,
        name: "Strength Builder",
        goal: WorkoutGoal::Strength,
        duration: 60,
        difficulty: Difficulty::Advanced,
        exercises: &[
            "Bicep curls",
            "Plank Taps",
            "Rollouts",
            "Single-arm rows",
            "Dumbbell Rows",
            "Chest Press",
            "Russian Twists",
        ],
        description: "Comprehensive strength training routine to build lean muscle.",
        video: "https://www.youtube.com/embed/IFR6BjSSwqk",
    },
    Workout {
        id: 5,
        name: "Cardio Blast",
        goal: WorkoutGoal::Cardio,
        duration: 30,
        difficulty: Difficulty::Beginner,
        exercises: &[
            "Warmup",
            "Burpee Lunge",
            "Bear Shoulder Taps",
            "Leg Kicks",
            "Double Crunches",
            "Plank Jumps",
            "Pop Squat",
        ],
        description: "Perfect cardio workout for beginners to improve heart health.",
        video: "https://www.youtube.com/embed/R7t3O8UFcHg",
    },
    Workout {
        id: 6,
        name: "Fat Burning HIIT",
        goal: WorkoutGoal::WeightLoss,
        duration: 30,
        difficulty: Difficulty::Advanced,
        exercises: &[
            "Skater",
            "Squat",
            "Mountain Climbers",
            "Power Jack",
            "Toe Tap",
            "Star Jump",
            "London Bridge",
            "Wide Toe Touch",
        ],
        description: "High-intensity interval training designed to maximize calorie burn in a short time.",
        video: "https://www.youtube.com/embed/ml6cT4AZdqI",
    },
    Workout {
        id: 7,
        name: "Dance Cardio",
        goal: WorkoutGoal::Cardio,
        duration: 25,
        difficulty: Difficulty::Intermediate,
        exercises: &[
            "Dance Steps",
            "Grapevine",
            "Kickboxing Moves",
            "Jumping Jacks",
            "Squats",
        ],
        description: "Fun dance-based cardio to get your heart pumping.",
        video: "https://www.youtube.com/embed/-PuJuk1GtjE",
    },
    Workout {
        id: 8,
        name: "Full Body Stretch",
        goal: WorkoutGoal::Flexibility,
        duration: 20,
        difficulty: Difficulty::Beginner,
        exercises: &[
            "Neck Rolls",
            "Shoulder Stretch",
            "Tricep Stretch",
            "Quad Stretch",
            "Glute Stretch",
            "Calf Stretch",
            "Ankle Rolls",
        ],
        description: "Comprehensive stretching routine for all major muscle groups.",
        video: "https://www.youtube.com/embed/DYGfwPppgO4",
    },
];

pub fn find_workout(id: u32) -> Option<&'static Workout> {
    WORKOUTS.iter().find(|workout| workout.id == id)
}

/// `None` lists every workout.
pub fn workouts_for_goal(goal: Option<WorkoutGoal>) -> Vec<&'static Workout> {
    WORKOUTS
        .iter()
        .filter(|workout| goal.is_none_or(|goal| workout.goal == goal))
        .collect()
}
