//! Prompt assembly for plan drafting and Q&A.
//!
//! Pure functions so the exact request contents can be unit-tested without
//! talking to the provider.

use intake_core::ClientProfile;

use crate::api_types::ChatMessage;
use crate::author::QuestionRequest;

/// System instruction for drafting a plan.
pub const PLAN_SYSTEM_PROMPT: &str = "Você é um personal trainer e nutricionista experiente. \
     A partir do perfil do cliente, escreva um plano de treino e alimentação \
     personalizado, em português, organizado por semana e por dia, com \
     orientações práticas e linguagem acessível.";

/// System instruction for answering follow-up questions.
pub const QA_SYSTEM_PROMPT: &str = "Você é o assistente do cliente. Responda dúvidas sobre o plano \
     dele de forma curta, prática e em português. Se a resposta não estiver \
     no plano, diga isso com honestidade.";

/// Sentinel used when a client has no stored plan text.
pub const PLAN_NOT_FOUND: &str = "Plano não encontrado.";

/// One line of the profile summary, with a placeholder for missing fields.
fn line(label: &str, value: Option<&str>) -> String {
    format!("{label}: {}", value.unwrap_or("não informado"))
}

/// Render a profile as the text block sent to the model.
pub fn profile_summary(profile: &ClientProfile) -> String {
    let mut lines = vec![
        line("Nome", profile.name.as_deref()),
        line("Idade", profile.age.as_deref()),
        line("Objetivo", profile.goal.as_deref()),
        line("Gênero", profile.gender.as_deref()),
        line("Altura", profile.height.as_deref()),
        line("Peso", profile.weight.as_deref()),
    ];

    // Secondary fields only when present; intake never prompts for them.
    let optional = [
        ("Experiência", profile.experience.as_deref()),
        ("Dias disponíveis", profile.available_days.as_deref()),
        ("Condições de saúde", profile.health_conditions.as_deref()),
        ("Preferências de exercício", profile.exercise_preferences.as_deref()),
        ("Restrições alimentares", profile.dietary_restrictions.as_deref()),
        ("Equipamento", profile.equipment.as_deref()),
        ("Motivação", profile.motivation.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }

    lines.join("\n")
}

/// Messages for a plan-drafting completion.
pub fn plan_messages(profile: &ClientProfile) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PLAN_SYSTEM_PROMPT),
        ChatMessage::user(format!("Perfil do cliente:\n{}", profile_summary(profile))),
    ]
}

/// Messages for a Q&A completion: the fixed instruction, the prior
/// transcript in its original order, then the plan text and the question.
pub fn question_messages(request: &QuestionRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage::system(QA_SYSTEM_PROMPT));
    messages.extend(request.history.iter().cloned());

    let plan = request.plan_text.as_deref().unwrap_or(PLAN_NOT_FOUND);
    messages.push(ChatMessage::user(format!(
        "Plano do cliente:\n{plan}\n\nPergunta: {}",
        request.question
    )));

    messages
}
