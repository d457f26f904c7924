//! Typed client profile and the fixed-order intake fields.

use serde::{Deserialize, Serialize};

/// The profile draft collected field-by-field during intake.
///
/// Persisted as JSON on the conversation row while intake is in progress and
/// copied onto the client row once payment is confirmed. Every field is
/// free text; the intake flow is presence-based and performs no validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    /// Display name.
    pub name: Option<String>,
    /// Age, as given by the client.
    pub age: Option<String>,
    /// Training goal (e.g. lose weight, gain muscle).
    pub goal: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Height, as given by the client.
    pub height: Option<String>,
    /// Current weight, as given by the client.
    pub weight: Option<String>,
    /// Training experience. Not prompted for during intake.
    pub experience: Option<String>,
    /// Days available per week. Not prompted for during intake.
    pub available_days: Option<String>,
    /// Health conditions. Not prompted for during intake.
    pub health_conditions: Option<String>,
    /// Exercise preferences. Not prompted for during intake.
    pub exercise_preferences: Option<String>,
    /// Dietary restrictions. Not prompted for during intake.
    pub dietary_restrictions: Option<String>,
    /// Available equipment. Not prompted for during intake.
    pub equipment: Option<String>,
    /// Motivation. Not prompted for during intake.
    pub motivation: Option<String>,
}

impl ClientProfile {
    /// The first intake field that has not been filled yet, in fixed order.
    ///
    /// Returns `None` once all six intake fields are present.
    pub fn next_missing(&self) -> Option<ProfileField> {
        ProfileField::INTAKE_ORDER
            .iter()
            .copied()
            .find(|field| field.get(self).is_none())
    }

    /// Whether all six intake fields have been filled.
    pub fn intake_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    /// Parse a profile from its JSON representation.
    ///
    /// Unknown keys are ignored so drafts written by older code (or the
    /// dashboard) still load.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the profile to JSON for storage on the conversation row.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// The six intake fields, in the fixed order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    Goal,
    Gender,
    Height,
    Weight,
}

impl ProfileField {
    /// Collection order: name, age, goal, gender, height, weight.
    pub const INTAKE_ORDER: [ProfileField; 6] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Goal,
        ProfileField::Gender,
        ProfileField::Height,
        ProfileField::Weight,
    ];

    /// The JSON/database key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Goal => "goal",
            ProfileField::Gender => "gender",
            ProfileField::Height => "height",
            ProfileField::Weight => "weight",
        }
    }

    /// The message sent to ask the client for this field.
    pub fn prompt(&self) -> &'static str {
        match self {
            ProfileField::Name => "Olá! Para começarmos, qual é o seu nome?",
            ProfileField::Age => "Quantos anos você tem?",
            ProfileField::Goal => {
                "Qual é o seu principal objetivo? (ex.: perder peso, ganhar massa)"
            }
            ProfileField::Gender => "Qual é o seu gênero?",
            ProfileField::Height => "Qual é a sua altura? (ex.: 1,75m)",
            ProfileField::Weight => "E o seu peso atual? (ex.: 80kg)",
        }
    }

    /// Read this field from a profile.
    pub fn get<'a>(&self, profile: &'a ClientProfile) -> Option<&'a str> {
        let value = match self {
            ProfileField::Name => &profile.name,
            ProfileField::Age => &profile.age,
            ProfileField::Goal => &profile.goal,
            ProfileField::Gender => &profile.gender,
            ProfileField::Height => &profile.height,
            ProfileField::Weight => &profile.weight,
        };
        value.as_deref()
    }

    /// Set this field on a profile. The value is stored as sent; empty or
    /// meaningful, the field counts as filled afterwards.
    pub fn set(&self, profile: &mut ClientProfile, value: impl Into<String>) {
        let value = Some(value.into());
        match self {
            ProfileField::Name => profile.name = value,
            ProfileField::Age => profile.age = value,
            ProfileField::Goal => profile.goal = value,
            ProfileField::Gender => profile.gender = value,
            ProfileField::Height => profile.height = value,
            ProfileField::Weight => profile.weight = value,
        }
    }
}
