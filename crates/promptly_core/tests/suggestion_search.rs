use promptly_core::db::open_db_in_memory;
use promptly_core::model::suggestion::NewSuggestion;
use promptly_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use promptly_core::repo::suggestion_repo::{
    SqliteSuggestionRepository, SuggestionListQuery, SuggestionRepository,
};
use promptly_core::repo::user_repo::SqliteUserRepository;
use promptly_core::service::account_service::AccountService;
use promptly_core::service::suggestion_service::{SuggestionFilter, SuggestionService};
use promptly_core::{AiSuggestion, ProjectId, RepoError, ServiceError, User, UserId};
use rusqlite::Connection;

fn user(conn: &Connection, username: &str) -> User {
    AccountService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(username, "correct horse")
        .unwrap()
        .user
}

fn seed(
    repo: &SqliteSuggestionRepository<'_>,
    owner_id: UserId,
    project_id: Option<ProjectId>,
    text: &str,
) -> AiSuggestion {
    repo.create_suggestion(&NewSuggestion {
        owner_id,
        project_id,
        task_id: None,
        text: text.to_string(),
    })
    .unwrap()
}

fn service(conn: &Connection) -> SuggestionService<SqliteSuggestionRepository<'_>, SqliteProjectRepository<'_>> {
    SuggestionService::new(
        SqliteSuggestionRepository::try_new(conn).unwrap(),
        SqliteProjectRepository::try_new(conn).unwrap(),
    )
}

fn ids(suggestions: &[AiSuggestion]) -> Vec<i64> {
    suggestions.iter().map(|s| s.id).collect()
}

#[test]
fn list_is_owner_scoped_and_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let bob = user(&conn, "bob");
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();

    let first = seed(&repo, ada.id, None, "Plan the week");
    seed(&repo, bob.id, None, "Plan the garage");
    let second = seed(&repo, ada.id, None, "Batch errands");

    let listed = repo
        .list_suggestions(&SuggestionListQuery::for_owner(ada.id))
        .unwrap();
    assert_eq!(ids(&listed), vec![second.id, first.id]);
}

#[test]
fn text_search_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();

    let hit = seed(&repo, ada.id, None, "Use the POMODORO technique");
    seed(&repo, ada.id, None, "Take breaks");

    let listed = repo
        .list_suggestions(&SuggestionListQuery {
            owner_id: ada.id,
            text_contains: Some("pomodoro".to_string()),
            project_id: None,
        })
        .unwrap();
    assert_eq!(ids(&listed), vec![hit.id]);
}

#[test]
fn text_search_matches_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();

    let percent = seed(&repo, ada.id, None, "Cut scope by 50%");
    seed(&repo, ada.id, None, "Cut scope by 50 items");
    let underscore = seed(&repo, ada.id, None, "rename file_name");
    seed(&repo, ada.id, None, "rename fileXname");

    let by_percent = repo
        .list_suggestions(&SuggestionListQuery {
            owner_id: ada.id,
            text_contains: Some("50%".to_string()),
            project_id: None,
        })
        .unwrap();
    assert_eq!(ids(&by_percent), vec![percent.id]);

    let by_underscore = repo
        .list_suggestions(&SuggestionListQuery {
            owner_id: ada.id,
            text_contains: Some("e_n".to_string()),
            project_id: None,
        })
        .unwrap();
    assert_eq!(ids(&by_underscore), vec![underscore.id]);
}

#[test]
fn service_listing_combines_filters_and_returns_projects() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let garden = projects.create_project(ada.id, "Garden").unwrap();
    let kitchen = projects.create_project(ada.id, "Kitchen").unwrap();
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();

    let wanted = seed(&repo, ada.id, Some(garden.id), "Water the tomatoes");
    seed(&repo, ada.id, Some(kitchen.id), "Water the herbs on the sill");
    seed(&repo, ada.id, Some(garden.id), "Weed the beds");

    let listing = service(&conn)
        .list_suggestions(
            &ada,
            &SuggestionFilter {
                query: Some("  water ".to_string()),
                project_id: Some(garden.id),
            },
        )
        .unwrap();

    assert_eq!(ids(&listing.suggestions), vec![wanted.id]);
    assert_eq!(listing.query, "water");
    assert_eq!(listing.selected_project, Some(garden.id));
    assert_eq!(
        listing.projects.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![garden.id, kitchen.id]
    );

    let unfiltered = service(&conn)
        .list_suggestions(&ada, &SuggestionFilter::default())
        .unwrap();
    assert_eq!(unfiltered.suggestions.len(), 3);
    assert_eq!(unfiltered.query, "");
}

#[test]
fn foreign_suggestions_look_missing() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let bob = user(&conn, "bob");
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();
    let theirs = seed(&repo, bob.id, None, "Bob's plan");
    let service = service(&conn);

    assert!(matches!(
        service.suggestion_for_edit(&ada, theirs.id),
        Err(ServiceError::NotFound { entity: "suggestion", .. })
    ));
    assert!(matches!(
        service.edit_suggestion(&ada, theirs.id, "Mine now"),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_suggestion(&ada, theirs.id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete_suggestion(theirs.id, ada.id),
        Err(RepoError::NotFound { entity: "suggestion", .. })
    ));
    assert_eq!(
        service.suggestion_for_edit(&bob, theirs.id).unwrap().text,
        "Bob's plan"
    );
}

#[test]
fn edit_and_delete_own_suggestion() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let repo = SqliteSuggestionRepository::try_new(&conn).unwrap();
    let mine = seed(&repo, ada.id, None, "Draft");
    let service = service(&conn);

    assert!(matches!(
        service.edit_suggestion(&ada, mine.id, "   "),
        Err(ServiceError::Validation(_))
    ));
    let edited = service.edit_suggestion(&ada, mine.id, "Final plan").unwrap();
    assert_eq!(edited.text, "Final plan");
    assert_eq!(edited.created_at, mine.created_at);

    service.delete_suggestion(&ada, mine.id).unwrap();
    assert_eq!(repo.count_suggestions(ada.id).unwrap(), 0);
}
