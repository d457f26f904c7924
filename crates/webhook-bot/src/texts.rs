//! Client-facing message texts.
//!
//! Everything the bot says lives here, in the conversation's language.

/// Sent while in intake after all six fields are already filled.
pub const PLEASE_WAIT: &str =
    "Já tenho tudo o que preciso! Aguarde um pouco enquanto preparo o seu plano.";

/// Reminder sent while waiting for a payment confirmation.
pub const PAYMENT_REMINDER: &str =
    "Assim que concluir o pagamento, me envie o comprovante por aqui para eu liberar o seu plano.";

/// Invitation sent right after the plan link.
pub const QUESTIONS_INVITE: &str =
    "Se tiver qualquer dúvida sobre o plano, é só perguntar por aqui!";

/// Sent when a Q&A message has no actual question in it.
pub const ASK_A_QUESTION: &str =
    "Pode mandar a sua pergunta sobre o plano que eu respondo!";

/// Sent when the document was stored but no usable link came back.
pub const PLAN_LINK_UNAVAILABLE: &str =
    "O seu plano foi gerado, mas não consegui obter o link agora. Me mande uma mensagem em instantes que eu tento de novo.";

/// Greeting wrapped around the first follow-up prompt, sent right after the
/// client's first message fills in their name.
pub fn greeting(name: &str, next_prompt: &str) -> String {
    format!("Prazer em te conhecer, {name}! Vou montar um plano personalizado para você. {next_prompt}")
}

/// Payment request sent once the profile is complete.
pub fn payment_request(link: Option<&str>) -> String {
    match link {
        Some(link) => format!(
            "Perfeito, já tenho o seu perfil completo! Para eu gerar o seu plano personalizado, conclua o pagamento aqui: {link} — depois me envie o comprovante por esta conversa."
        ),
        None => "Perfeito, já tenho o seu perfil completo! Para eu gerar o seu plano personalizado, conclua o pagamento e me envie o comprovante por esta conversa.".to_string(),
    }
}

/// The message carrying the public plan URL.
pub fn plan_ready(url: &str) -> String {
    format!("O seu plano está pronto! Baixe aqui: {url}")
}
