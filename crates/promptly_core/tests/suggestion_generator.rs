use promptly_core::db::open_db_in_memory;
use promptly_core::llm::generator::{build_messages, SYSTEM_PROMPT};
use promptly_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use promptly_core::repo::suggestion_repo::{SqliteSuggestionRepository, SuggestionRepository};
use promptly_core::repo::user_repo::SqliteUserRepository;
use promptly_core::service::account_service::AccountService;
use promptly_core::service::suggestion_service::SuggestionService;
use promptly_core::{
    ChatChunk, ChatCompletion, ChatError, ChatMessage, ChatResult, ChatStream, Role,
    ServiceError, SuggestionGenerator, User, GENERATION_ERROR_PREFIX,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn register(conn: &Connection, username: &str) -> User {
    AccountService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(username, "correct horse")
        .unwrap()
        .user
}

/// Replays canned chunks and records every request it receives.
struct ScriptedChat {
    chunks: Vec<ChatResult<ChatChunk>>,
    open_error: Option<ChatError>,
    requests: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl ScriptedChat {
    fn replying(chunks: Vec<ChatResult<ChatChunk>>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            open_error: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: ChatError) -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            open_error: Some(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatCompletion for ScriptedChat {
    fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> ChatResult<ChatStream> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }
        Ok(Box::new(self.chunks.clone().into_iter()))
    }
}

#[test]
fn generate_concatenates_fragments_in_order() {
    let chat = ScriptedChat::replying(vec![
        Ok(ChatChunk::text("1. List ")),
        Ok(ChatChunk::default()),
        Ok(ChatChunk::text("tasks.")),
        Ok(ChatChunk {
            content: None,
            done: true,
        }),
    ]);
    let generator = SuggestionGenerator::new(chat.clone(), "llama3.2");

    assert_eq!(generator.generate("Plan my week", None), "1. List tasks.");

    let requests = chat.requests();
    assert_eq!(requests.len(), 1);
    let (model, messages) = &requests[0];
    assert_eq!(model, "llama3.2");
    assert_eq!(
        messages,
        &vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user("Plan my week"),
        ]
    );
}

#[test]
fn generate_places_history_between_system_and_prompt() {
    let chat = ScriptedChat::replying(vec![Ok(ChatChunk::text("ok"))]);
    let generator =
        SuggestionGenerator::new(chat.clone(), "tiny").with_system_prompt("Be brief.");
    let history = vec![
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hello"),
    ];

    generator.generate("Next?", Some(&history));

    let (_, messages) = &chat.requests()[0];
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(messages[0].content, "Be brief.");
    assert_eq!(messages[3].content, "Next?");
}

#[test]
fn empty_history_matches_no_history() {
    assert_eq!(
        build_messages("sys", Some(&[]), "p"),
        build_messages("sys", None, "p")
    );
}

#[test]
fn generate_folds_connection_failure_into_text() {
    let chat = ScriptedChat::failing(ChatError::Transport("connection refused".to_string()));
    let generator = SuggestionGenerator::new(chat, "llama3.2");

    let text = generator.generate("Plan my week", None);
    assert!(text.starts_with(GENERATION_ERROR_PREFIX));
    assert!(text.contains("connection refused"));
}

#[test]
fn generate_discards_partial_text_on_mid_stream_failure() {
    let chat = ScriptedChat::replying(vec![
        Ok(ChatChunk::text("partial answer")),
        Err(ChatError::Service("model crashed".to_string())),
    ]);
    let generator = SuggestionGenerator::new(chat, "llama3.2");

    let text = generator.generate("Plan my week", None);
    assert!(text.starts_with(GENERATION_ERROR_PREFIX));
    assert!(text.contains("model crashed"));
    assert!(!text.contains("partial answer"));
}

#[test]
fn generate_suggestion_persists_reply_against_owned_project() {
    let conn = open_db_in_memory().unwrap();
    let ada = register(&conn, "ada");
    let project = SqliteProjectRepository::try_new(&conn)
        .unwrap()
        .create_project(ada.id, "Garden")
        .unwrap();
    let generator = SuggestionGenerator::new(
        ScriptedChat::replying(vec![Ok(ChatChunk::text("Dig beds"))]),
        "llama3.2",
    );
    let service = SuggestionService::new(
        SqliteSuggestionRepository::try_new(&conn).unwrap(),
        SqliteProjectRepository::try_new(&conn).unwrap(),
    );

    let stored = service
        .generate_suggestion(&ada, "  What first? ", Some(project.id), &generator)
        .unwrap();
    assert_eq!(stored.text, "Dig beds");
    assert_eq!(stored.project_id, Some(project.id));
    assert_eq!(stored.task_id, None);
    assert_eq!(stored.owner_id, ada.id);
}

#[test]
fn generate_suggestion_rejects_blank_prompt_and_foreign_project_without_calling_model() {
    let conn = open_db_in_memory().unwrap();
    let ada = register(&conn, "ada");
    let bob = register(&conn, "bob");
    let bobs_project = SqliteProjectRepository::try_new(&conn)
        .unwrap()
        .create_project(bob.id, "Garage")
        .unwrap();
    let chat = ScriptedChat::replying(vec![Ok(ChatChunk::text("never"))]);
    let generator = SuggestionGenerator::new(chat.clone(), "llama3.2");
    let service = SuggestionService::new(
        SqliteSuggestionRepository::try_new(&conn).unwrap(),
        SqliteProjectRepository::try_new(&conn).unwrap(),
    );

    assert!(matches!(
        service.generate_suggestion(&ada, "   ", None, &generator),
        Err(ServiceError::Validation(ref errors)) if errors.has_field("prompt")
    ));
    assert!(matches!(
        service.generate_suggestion(&ada, "Help", Some(bobs_project.id), &generator),
        Err(ServiceError::NotFound { entity: "project", .. })
    ));
    assert!(matches!(
        service.generate_suggestion(&ada, "Help", Some(9_999), &generator),
        Err(ServiceError::NotFound { entity: "project", .. })
    ));

    assert!(chat.requests().is_empty());
    let suggestions = SqliteSuggestionRepository::try_new(&conn).unwrap();
    assert_eq!(suggestions.count_suggestions(ada.id).unwrap(), 0);
}

#[test]
fn generation_failure_is_still_recorded() {
    let conn = open_db_in_memory().unwrap();
    let ada = register(&conn, "ada");
    let generator = SuggestionGenerator::new(
        ScriptedChat::failing(ChatError::Status {
            code: 404,
            message: "model 'llama3.2' not found".to_string(),
        }),
        "llama3.2",
    );
    let service = SuggestionService::new(
        SqliteSuggestionRepository::try_new(&conn).unwrap(),
        SqliteProjectRepository::try_new(&conn).unwrap(),
    );

    let stored = service
        .generate_suggestion(&ada, "Plan", None, &generator)
        .unwrap();
    assert!(stored.text.starts_with(GENERATION_ERROR_PREFIX));
    assert_eq!(stored.project_id, None);
}
