//! The intake & fulfillment state machine.
//!
//! One inbound message at a time: resolve the client and their active
//! conversation, dispatch on the conversation state, and let the handler
//! drive the collaborators (store, plan author, renderer, blob store,
//! gateway). Handler failures are swallowed here, logged and answered with a
//! taxonomy-derived message, so a single client's bad day never changes the
//! HTTP outcome for the gateway or affects other clients.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use blob_store::BlobStore;
use database::{chat_message, client, conversation, Client, Conversation, Database};
use intake_core::{ClientProfile, ConversationState, ProfileField, UnknownState};
use plan_author::{ChatMessage, PlanAuthor, QuestionRequest};
use regex::Regex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::locks::ClientLocks;
use crate::sender::MessageSender;
use crate::texts;

/// Timeout for plan-author completions.
const DEFAULT_AUTHOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for blob uploads.
const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

static PAYMENT_RE: OnceLock<Regex> = OnceLock::new();

/// Whether a message reads as a payment confirmation.
fn payment_confirmed(text: &str) -> bool {
    let re = PAYMENT_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(pag(uei|o|amento)|comprovante|comprovativo|recibo|transfer(i|ência|encia)|feito|pronto)\b",
        )
        .expect("payment regex is valid")
    });
    re.is_match(text)
}

fn parse_context(context: &str) -> ClientProfile {
    ClientProfile::from_json(context).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable conversation context, starting fresh");
        ClientProfile::default()
    })
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The per-client conversation state machine.
pub struct IntakeMachine {
    db: Database,
    sender: Arc<dyn MessageSender>,
    author: Arc<dyn PlanAuthor>,
    blobs: Arc<dyn BlobStore>,
    locks: ClientLocks,
    payment_link: Option<String>,
    author_timeout: Duration,
    upload_timeout: Duration,
}

impl IntakeMachine {
    /// Create a new state machine over the given collaborators.
    pub fn new(
        db: Database,
        sender: Arc<dyn MessageSender>,
        author: Arc<dyn PlanAuthor>,
        blobs: Arc<dyn BlobStore>,
        payment_link: Option<String>,
    ) -> Self {
        Self {
            db,
            sender,
            author,
            blobs,
            locks: ClientLocks::new(),
            payment_link,
            author_timeout: DEFAULT_AUTHOR_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Handle one inbound message for one client.
    ///
    /// Transitions for the same phone number are serialized by a per-client
    /// lock held across the whole call; distinct clients run concurrently.
    /// Returns `Err` only when resolution itself fails (the database is
    /// unreachable, for instance); handler failures are answered in-chat
    /// and swallowed.
    pub async fn handle_inbound(&self, phone: &str, text: &str) -> Result<(), BotError> {
        let _guard = self.locks.acquire(phone).await;

        let client = client::find_or_create_by_phone(self.db.pool(), phone).await?;
        if !client.ai_enabled {
            debug!(phone, "ai disabled for client, ignoring message");
            return Ok(());
        }

        let conversation = conversation::latest_for_client(self.db.pool(), &client.id).await?;
        let state = match &conversation {
            Some(conv) => conv.state.parse::<ConversationState>().unwrap_or_else(
                |UnknownState(value)| {
                    warn!(phone, value, "unknown conversation state, restarting intake");
                    ConversationState::Start
                },
            ),
            None => ConversationState::Start,
        };
        debug!(phone, state = %state, "dispatching inbound message");

        if let Err(e) = self.dispatch(&client, conversation, state, text).await {
            error!(phone, error = %e, "state handler failed");
            // The client always gets an answer, even on failure. Best
            // effort; there is nothing left to do if the send fails too.
            let _ = self.sender.send_text(phone, e.user_message()).await;
        }

        Ok(())
    }

    async fn dispatch(
        &self,
        client: &Client,
        conversation: Option<Conversation>,
        state: ConversationState,
        text: &str,
    ) -> Result<(), BotError> {
        // Q&A logs its own transcript rows so grounding sees only prior
        // messages; every other state logs the inbound text up front.
        if state != ConversationState::Questions {
            chat_message::append(self.db.pool(), &client.id, "user", text).await?;
        }

        match state {
            ConversationState::Start => self.start_intake(client, text).await,
            ConversationState::WaitingForInfo => {
                let conversation = require_conversation(conversation, state)?;
                self.collect_info(client, &conversation, text).await
            }
            ConversationState::WaitingForPayment => {
                let conversation = require_conversation(conversation, state)?;
                self.check_payment(client, &conversation, text).await
            }
            ConversationState::Paid => {
                let conversation = require_conversation(conversation, state)?;
                self.run_pipeline(client, &conversation).await
            }
            ConversationState::Questions => self.answer_question(client, text).await,
        }
    }

    /// First contact: create the conversation and consume the message as
    /// the first intake field.
    async fn start_intake(&self, client: &Client, text: &str) -> Result<(), BotError> {
        let conversation = conversation::create(
            self.db.pool(),
            &client.id,
            ConversationState::WaitingForInfo.as_str(),
            "{}",
        )
        .await?;
        info!(phone = %client.phone, "intake started");

        self.collect_info(client, &conversation, text).await
    }

    /// Fill the next missing profile field and prompt for the one after it.
    async fn collect_info(
        &self,
        client: &Client,
        conversation: &Conversation,
        text: &str,
    ) -> Result<(), BotError> {
        let mut profile = parse_context(&conversation.context);

        let Some(field) = profile.next_missing() else {
            // Profile already complete; further input is ignored until the
            // conversation moves on.
            return self.send_and_log(client, texts::PLEASE_WAIT).await;
        };

        // Presence-based fill: whatever was sent sets the field.
        field.set(&mut profile, text.trim());
        conversation::update_context(self.db.pool(), &conversation.id, &profile.to_json()).await?;
        debug!(phone = %client.phone, field = field.key(), "profile field filled");

        match profile.next_missing() {
            Some(next) => {
                let prompt = if field == ProfileField::Name {
                    let name = profile.name.as_deref().unwrap_or_default();
                    texts::greeting(name, next.prompt())
                } else {
                    next.prompt().to_string()
                };
                self.send_and_log(client, &prompt).await
            }
            None => {
                conversation::update_state(
                    self.db.pool(),
                    &conversation.id,
                    ConversationState::WaitingForPayment.as_str(),
                )
                .await?;
                info!(phone = %client.phone, "profile complete, awaiting payment");
                self.send_and_log(client, &texts::payment_request(self.payment_link.as_deref()))
                    .await
            }
        }
    }

    /// Gate on a payment confirmation; on a match the paid handler runs
    /// inline on the same message.
    async fn check_payment(
        &self,
        client: &Client,
        conversation: &Conversation,
        text: &str,
    ) -> Result<(), BotError> {
        if !payment_confirmed(text) {
            return self.send_and_log(client, texts::PAYMENT_REMINDER).await;
        }

        conversation::update_state(
            self.db.pool(),
            &conversation.id,
            ConversationState::Paid.as_str(),
        )
        .await?;
        info!(phone = %client.phone, "payment confirmed");

        self.run_pipeline(client, conversation).await
    }

    /// The plan generation pipeline. Runs on entering PAID and again on
    /// every inbound message while the conversation stays there, so a
    /// failed attempt is retried from the top by the client's next message.
    async fn run_pipeline(&self, client: &Client, conversation: &Conversation) -> Result<(), BotError> {
        self.sender.send_typing(&client.phone, true).await;
        let result = self.generate_and_deliver(client, conversation).await;
        self.sender.send_typing(&client.phone, false).await;
        result
    }

    async fn generate_and_deliver(
        &self,
        client: &Client,
        conversation: &Conversation,
    ) -> Result<(), BotError> {
        let profile = parse_context(&conversation.context);

        // 1. draft the plan
        let plan_text = timeout(self.author_timeout, self.author.draft_plan(&profile))
            .await
            .map_err(|_| BotError::DependencyTimeout {
                dependency: "plan author",
            })??;

        // 2. persist the text before anything can still fail
        client::set_plan_text(self.db.pool(), &client.id, &plan_text).await?;

        // 3. render
        let document = pdf_render::render_plan(&profile, &plan_text)?;

        // 4. upload under a path keyed by phone and timestamp
        let path = format!("{}-{}.pdf", client.phone, unix_timestamp());
        let url = timeout(
            self.upload_timeout,
            self.blobs.upload(&path, document, "application/pdf"),
        )
        .await
        .map_err(|_| BotError::DependencyTimeout {
            dependency: "blob storage",
        })??;

        if url.trim().is_empty() {
            // Stored but unreachable. Tell the client; the conversation
            // stays where it is so their next message retries.
            warn!(phone = %client.phone, path, "upload returned no public url");
            return self.send_and_log(client, texts::PLAN_LINK_UNAVAILABLE).await;
        }

        // 5. deliver the link
        self.send_and_log(client, &texts::plan_ready(&url)).await?;

        // 6. flip the client row and snapshot the collected profile
        client::mark_paid(self.db.pool(), &client.id, &url).await?;
        client::apply_profile(self.db.pool(), &client.id, &profile).await?;

        // 7. move to Q&A
        conversation::update_state(
            self.db.pool(),
            &conversation.id,
            ConversationState::Questions.as_str(),
        )
        .await?;
        info!(phone = %client.phone, url, "plan delivered");
        self.send_and_log(client, texts::QUESTIONS_INVITE).await
    }

    /// Answer a free-form question about the stored plan.
    async fn answer_question(&self, client: &Client, text: &str) -> Result<(), BotError> {
        let question = text.trim();
        if question.is_empty() {
            // No AI call, no transcript mutation.
            return self.sender.send_text(&client.phone, texts::ASK_A_QUESTION).await;
        }

        // History is read before the question is logged so the completion
        // sees the prior transcript plus exactly one copy of the question.
        let history: Vec<ChatMessage> = chat_message::history_for_client(self.db.pool(), &client.id)
            .await?
            .into_iter()
            .map(|m| ChatMessage {
                role: m.role,
                content: m.content,
            })
            .collect();
        chat_message::append(self.db.pool(), &client.id, "user", question).await?;

        let request = QuestionRequest {
            plan_text: client.plan_text.clone(),
            history,
            question: question.to_string(),
        };

        self.sender.send_typing(&client.phone, true).await;
        let result = timeout(self.author_timeout, self.author.answer_question(&request))
            .await
            .map_err(|_| BotError::DependencyTimeout {
                dependency: "plan author",
            })
            .and_then(|inner| inner.map_err(BotError::from));
        self.sender.send_typing(&client.phone, false).await;

        let answer = result?;
        self.send_and_log(client, &answer).await
    }

    /// Send a message and append it to the transcript as the assistant.
    async fn send_and_log(&self, client: &Client, text: &str) -> Result<(), BotError> {
        self.sender.send_text(&client.phone, text).await?;
        chat_message::append(self.db.pool(), &client.id, "assistant", text).await?;
        Ok(())
    }
}

fn require_conversation(
    conversation: Option<Conversation>,
    state: ConversationState,
) -> Result<Conversation, BotError> {
    conversation.ok_or_else(|| {
        BotError::Internal(format!("no conversation row while in state {state}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::RecordingSender;
    use async_trait::async_trait;
    use blob_store::{BlobError, MemoryBlobStore};
    use plan_author::CannedAuthor;

    const PHONE: &str = "351911111111";

    struct Harness {
        machine: IntakeMachine,
        db: Database,
        sender: Arc<RecordingSender>,
        author: Arc<CannedAuthor>,
        blobs: Arc<MemoryBlobStore>,
    }

    async fn harness() -> Harness {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let author = Arc::new(CannedAuthor::new("plano canned", "resposta canned"));
        let blobs = Arc::new(MemoryBlobStore::new());
        let machine = IntakeMachine::new(
            db.clone(),
            sender.clone(),
            author.clone(),
            blobs.clone(),
            Some("https://pay.test/plano".to_string()),
        );

        Harness {
            machine,
            db,
            sender,
            author,
            blobs,
        }
    }

    fn full_profile() -> ClientProfile {
        let mut profile = ClientProfile::default();
        ProfileField::Name.set(&mut profile, "João");
        ProfileField::Age.set(&mut profile, "31");
        ProfileField::Goal.set(&mut profile, "perder peso");
        ProfileField::Gender.set(&mut profile, "masculino");
        ProfileField::Height.set(&mut profile, "1,80m");
        ProfileField::Weight.set(&mut profile, "88kg");
        profile
    }

    /// Seed a client with an existing conversation in the given state.
    async fn seed_conversation(h: &Harness, state: ConversationState, context: &str) -> Client {
        let client = client::find_or_create_by_phone(h.db.pool(), PHONE).await.unwrap();
        conversation::create(h.db.pool(), &client.id, state.as_str(), context)
            .await
            .unwrap();
        client
    }

    #[test]
    fn test_payment_confirmation_pattern() {
        assert!(payment_confirmed("paguei"));
        assert!(payment_confirmed("PAGUEI agora"));
        assert!(payment_confirmed("segue o comprovante"));
        assert!(payment_confirmed("transferência enviada"));
        assert!(payment_confirmed("já está pago"));
        assert!(payment_confirmed("recibo em anexo"));
        assert!(payment_confirmed("feito!"));

        assert!(!payment_confirmed("oi, tudo bem?"));
        assert!(!payment_confirmed("vou pagar amanhã"));
        assert!(!payment_confirmed("quanto custa?"));
    }

    #[tokio::test]
    async fn test_first_contact_creates_conversation_and_consumes_name() {
        let h = harness().await;

        h.machine.handle_inbound(PHONE, "João").await.unwrap();

        let client = client::find_by_phone(h.db.pool(), PHONE).await.unwrap().unwrap();
        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "WAITING_FOR_INFO");

        let profile = ClientProfile::from_json(&conv.context).unwrap();
        assert_eq!(profile.name.as_deref(), Some("João"));

        // Exactly one outbound message: the greeting asking for the age.
        let sent = h.sender.texts();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("João"));
        assert!(sent[0].contains("Quantos anos"));
    }

    #[tokio::test]
    async fn test_intake_fills_fields_in_order_then_requests_payment() {
        let h = harness().await;
        let answers = ["João", "31", "perder peso", "masculino", "1,80m", "88kg"];

        for answer in answers {
            h.machine.handle_inbound(PHONE, answer).await.unwrap();
        }

        let client = client::find_by_phone(h.db.pool(), PHONE).await.unwrap().unwrap();
        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "WAITING_FOR_PAYMENT");

        let profile = ClientProfile::from_json(&conv.context).unwrap();
        assert_eq!(profile.name.as_deref(), Some("João"));
        assert_eq!(profile.age.as_deref(), Some("31"));
        assert_eq!(profile.goal.as_deref(), Some("perder peso"));
        assert_eq!(profile.gender.as_deref(), Some("masculino"));
        assert_eq!(profile.height.as_deref(), Some("1,80m"));
        assert_eq!(profile.weight.as_deref(), Some("88kg"));

        // Exactly one reply per inbound message, ending in the payment
        // request with the configured link.
        let sent = h.sender.texts();
        assert_eq!(sent.len(), 6);
        assert!(sent[1].contains("objetivo"));
        assert!(sent[2].contains("gênero"));
        assert!(sent[3].contains("altura"));
        assert!(sent[4].contains("peso"));
        assert!(sent[5].contains("https://pay.test/plano"));
    }

    #[tokio::test]
    async fn test_full_profile_further_input_gets_please_wait() {
        let h = harness().await;
        seed_conversation(&h, ConversationState::WaitingForInfo, &full_profile().to_json()).await;

        h.machine.handle_inbound(PHONE, "e agora?").await.unwrap();

        assert_eq!(h.sender.texts(), vec![texts::PLEASE_WAIT.to_string()]);

        let client = client::find_by_phone(h.db.pool(), PHONE).await.unwrap().unwrap();
        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "WAITING_FOR_INFO");
    }

    #[tokio::test]
    async fn test_non_matching_payment_message_gets_reminder() {
        let h = harness().await;
        seed_conversation(&h, ConversationState::WaitingForPayment, &full_profile().to_json())
            .await;

        h.machine.handle_inbound(PHONE, "oi, tudo bem?").await.unwrap();

        assert_eq!(h.sender.texts(), vec![texts::PAYMENT_REMINDER.to_string()]);
        assert!(h.blobs.paths().is_empty());

        let client = client::find_by_phone(h.db.pool(), PHONE).await.unwrap().unwrap();
        assert!(!client.paid);
        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "WAITING_FOR_PAYMENT");
    }

    #[tokio::test]
    async fn test_payment_confirmation_runs_pipeline_to_questions() {
        let h = harness().await;
        seed_conversation(&h, ConversationState::WaitingForPayment, &full_profile().to_json())
            .await;

        h.machine.handle_inbound(PHONE, "paguei agora mesmo").await.unwrap();

        let client = client::find_by_phone(h.db.pool(), PHONE).await.unwrap().unwrap();
        assert!(client.paid);
        assert_eq!(client.plan_text.as_deref(), Some("plano canned"));
        let plan_url = client.plan_url.expect("plan url set");
        assert!(plan_url.starts_with("memory://"));

        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "QUESTIONS");

        // The pipeline ran exactly once and uploaded a real PDF keyed by
        // phone number.
        let paths = h.blobs.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with(PHONE));
        assert!(paths[0].ends_with(".pdf"));
        assert!(h.blobs.bytes_for(&paths[0]).unwrap().starts_with(b"%PDF"));

        // Link message first, then the Q&A invitation.
        let sent = h.sender.texts();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains(&plan_url));
        assert_eq!(sent[1], texts::QUESTIONS_INVITE);

        // The profile snapshot landed on the client row.
        assert_eq!(client.name.as_deref(), Some("João"));
        assert_eq!(client.weight.as_deref(), Some("88kg"));
    }

    /// A blob store that fails a fixed number of uploads before delegating
    /// to an in-memory store.
    struct FlakyBlobStore {
        failures: std::sync::Mutex<u32>,
        inner: MemoryBlobStore,
    }

    #[async_trait]
    impl BlobStore for FlakyBlobStore {
        async fn upload(
            &self,
            path: &str,
            bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<String, BlobError> {
            {
                let mut failures = self.failures.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(BlobError::Rejected {
                        status: 503,
                        message: "storage unavailable".to_string(),
                    });
                }
            }
            self.inner.upload(path, bytes, content_type).await
        }
    }

    #[tokio::test]
    async fn test_pipeline_failure_stays_paid_and_retries_from_the_top() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let sender = Arc::new(RecordingSender::new());
        let author = Arc::new(CannedAuthor::new("plano canned", "resposta canned"));
        let blobs = Arc::new(FlakyBlobStore {
            failures: std::sync::Mutex::new(1),
            inner: MemoryBlobStore::new(),
        });
        let machine = IntakeMachine::new(db.clone(), sender.clone(), author.clone(), blobs.clone(), None);

        let client = client::find_or_create_by_phone(db.pool(), PHONE).await.unwrap();
        conversation::create(
            db.pool(),
            &client.id,
            ConversationState::WaitingForPayment.as_str(),
            &full_profile().to_json(),
        )
        .await
        .unwrap();

        // First attempt: upload fails, the conversation stays PAID and the
        // client gets the taxonomy-derived message, never the raw error.
        machine.handle_inbound(PHONE, "paguei").await.unwrap();

        let stored = client::find_by_phone(db.pool(), PHONE).await.unwrap().unwrap();
        assert!(!stored.paid);
        let conv = conversation::latest_for_client(db.pool(), &stored.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "PAID");

        let expected = BotError::DependencyRejected {
            dependency: "blob storage",
            message: String::new(),
        };
        let last = sender.texts().pop().unwrap();
        assert_eq!(last, expected.user_message());
        assert!(!last.contains("storage unavailable"));

        // Any next message re-runs the whole pipeline from step 1.
        machine.handle_inbound(PHONE, "e aí?").await.unwrap();

        let stored = client::find_by_phone(db.pool(), PHONE).await.unwrap().unwrap();
        assert!(stored.paid);
        assert!(stored.plan_url.is_some());
        let conv = conversation::latest_for_client(db.pool(), &stored.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "QUESTIONS");
        assert_eq!(blobs.inner.paths().len(), 1);
    }

    #[tokio::test]
    async fn test_question_request_grounds_on_prior_transcript() {
        let h = harness().await;
        let client = seed_conversation(&h, ConversationState::Questions, &full_profile().to_json())
            .await;
        client::set_plan_text(h.db.pool(), &client.id, "plano guardado")
            .await
            .unwrap();

        chat_message::append(h.db.pool(), &client.id, "user", "olá").await.unwrap();
        chat_message::append(h.db.pool(), &client.id, "assistant", "bem-vindo")
            .await
            .unwrap();
        chat_message::append(h.db.pool(), &client.id, "system", "nota interna")
            .await
            .unwrap();

        h.machine
            .handle_inbound(PHONE, "posso treinar à noite?")
            .await
            .unwrap();

        let questions = h.author.questions();
        assert_eq!(questions.len(), 1);
        let request = &questions[0];
        assert_eq!(request.plan_text.as_deref(), Some("plano guardado"));
        assert_eq!(request.question, "posso treinar à noite?");

        // Exactly the prior user/assistant rows, in order, no system rows.
        let roles: Vec<&str> = request.history.iter().map(|m| m.role.as_str()).collect();
        let contents: Vec<&str> = request.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(roles, ["user", "assistant"]);
        assert_eq!(contents, ["olá", "bem-vindo"]);

        // The answer was sent verbatim and both sides were persisted.
        assert_eq!(h.sender.texts(), vec!["resposta canned"]);
        let history = chat_message::history_for_client(h.db.pool(), &client.id)
            .await
            .unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            ["olá", "bem-vindo", "posso treinar à noite?", "resposta canned"]
        );
    }

    #[tokio::test]
    async fn test_blank_question_prompts_without_touching_transcript() {
        let h = harness().await;
        let client = seed_conversation(&h, ConversationState::Questions, &full_profile().to_json())
            .await;

        h.machine.handle_inbound(PHONE, "   ").await.unwrap();

        assert_eq!(h.sender.texts(), vec![texts::ASK_A_QUESTION.to_string()]);
        assert!(h.author.questions().is_empty());
        assert_eq!(
            chat_message::count_for_client(h.db.pool(), &client.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_ai_disabled_client_is_ignored() {
        let h = harness().await;
        let client = client::find_or_create_by_phone(h.db.pool(), PHONE).await.unwrap();
        client::set_ai_enabled(h.db.pool(), &client.id, false).await.unwrap();

        h.machine.handle_inbound(PHONE, "olá").await.unwrap();

        assert!(h.sender.texts().is_empty());
        assert!(conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            chat_message::count_for_client(h.db.pool(), &client.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_legacy_state_value_restarts_intake() {
        let h = harness().await;
        let client = client::find_or_create_by_phone(h.db.pool(), PHONE).await.unwrap();
        // A row written by an older version with a state no transition
        // reaches anymore.
        conversation::create(h.db.pool(), &client.id, "SENT_PLAN", "{}")
            .await
            .unwrap();

        h.machine.handle_inbound(PHONE, "Maria").await.unwrap();

        let conv = conversation::latest_for_client(h.db.pool(), &client.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conv.state, "WAITING_FOR_INFO");
        let profile = ClientProfile::from_json(&conv.context).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Maria"));
    }
}
