use promptly_core::db::open_db_in_memory;
use promptly_core::model::suggestion::NewSuggestion;
use promptly_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use promptly_core::repo::suggestion_repo::{
    SqliteSuggestionRepository, SuggestionListQuery, SuggestionRepository,
};
use promptly_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use promptly_core::repo::user_repo::SqliteUserRepository;
use promptly_core::service::account_service::AccountService;
use promptly_core::service::project_service::ProjectService;
use promptly_core::service::stats_service::StatsService;
use promptly_core::service::task_service::TaskService;
use promptly_core::{RepoError, ServiceError, User};
use rusqlite::Connection;

fn user(conn: &Connection, username: &str) -> User {
    AccountService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(username, "correct horse")
        .unwrap()
        .user
}

fn project_service(conn: &Connection) -> ProjectService<SqliteProjectRepository<'_>, SqliteTaskRepository<'_>> {
    ProjectService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqliteTaskRepository::try_new(conn).unwrap(),
    )
}

fn task_service(conn: &Connection) -> TaskService<SqliteProjectRepository<'_>, SqliteTaskRepository<'_>> {
    TaskService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqliteTaskRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn create_and_list_projects_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let service = project_service(&conn);

    let first = service.create_project(&ada, "  Garden  ").unwrap();
    let second = service.create_project(&ada, "Kitchen").unwrap();

    assert_eq!(first.text, "Garden");
    assert_eq!(first.owner_id, ada.id);
    let listed = service.list_projects(&ada).unwrap();
    assert_eq!(
        listed.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
}

#[test]
fn project_text_is_validated_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let service = project_service(&conn);

    let blank = service.create_project(&ada, "   ").unwrap_err();
    assert!(matches!(blank, ServiceError::Validation(ref errors) if errors.has_field("text")));

    let too_long = "x".repeat(201);
    assert!(matches!(
        service.create_project(&ada, &too_long),
        Err(ServiceError::Validation(_))
    ));
    assert!(service.create_project(&ada, &"x".repeat(200)).is_ok());
    assert_eq!(service.list_projects(&ada).unwrap().len(), 1);
}

#[test]
fn project_detail_lists_tasks_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let projects = project_service(&conn);
    let tasks = task_service(&conn);

    let project = projects.create_project(&ada, "Garden").unwrap();
    let older = tasks.create_task(&ada, project.id, "Buy seeds").unwrap();
    let newer = tasks.create_task(&ada, project.id, "Dig beds").unwrap();

    let detail = projects.project_detail(&ada, project.id).unwrap();
    assert_eq!(detail.project, project);
    assert_eq!(
        detail.tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );
}

#[test]
fn edit_project_and_task_replace_text() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let projects = project_service(&conn);
    let tasks = task_service(&conn);

    let project = projects.create_project(&ada, "Garden").unwrap();
    let task = tasks.create_task(&ada, project.id, "Buy seeds").unwrap();

    let renamed = projects.edit_project(&ada, project.id, "Backyard").unwrap();
    assert_eq!(renamed.text, "Backyard");
    assert_eq!(renamed.created_at, project.created_at);

    let edited = tasks.edit_task(&ada, task.id, "Buy tomato seeds").unwrap();
    assert_eq!(edited.text, "Buy tomato seeds");
    assert_eq!(edited.project_id, project.id);

    let form = tasks.task_for_edit(&ada, task.id).unwrap();
    assert_eq!(form.task.text, "Buy tomato seeds");
    assert_eq!(form.project.text, "Backyard");
}

#[test]
fn deleting_a_project_cascades_to_tasks_and_suggestions() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let projects = project_service(&conn);
    let tasks = task_service(&conn);
    let suggestions = SqliteSuggestionRepository::try_new(&conn).unwrap();

    let doomed = projects.create_project(&ada, "Garden").unwrap();
    let kept = projects.create_project(&ada, "Kitchen").unwrap();
    let task = tasks.create_task(&ada, doomed.id, "Buy seeds").unwrap();
    tasks.create_task(&ada, kept.id, "Clean oven").unwrap();
    suggestions
        .create_suggestion(&NewSuggestion {
            owner_id: ada.id,
            project_id: Some(doomed.id),
            task_id: None,
            text: "Plant in spring".to_string(),
        })
        .unwrap();
    suggestions
        .create_suggestion(&NewSuggestion {
            owner_id: ada.id,
            project_id: None,
            task_id: Some(task.id),
            text: "Compare suppliers".to_string(),
        })
        .unwrap();
    let unattached = suggestions
        .create_suggestion(&NewSuggestion {
            owner_id: ada.id,
            project_id: None,
            task_id: None,
            text: "General tip".to_string(),
        })
        .unwrap();

    projects.delete_project(&ada, doomed.id).unwrap();

    let task_repo = SqliteTaskRepository::try_new(&conn).unwrap();
    assert!(task_repo.get_task(task.id).unwrap().is_none());
    assert_eq!(task_repo.count_tasks_for_owner(ada.id).unwrap(), 1);
    let remaining = suggestions
        .list_suggestions(&SuggestionListQuery::for_owner(ada.id))
        .unwrap();
    assert_eq!(remaining, vec![unattached]);
}

#[test]
fn deleting_a_task_leaves_its_project() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let projects = project_service(&conn);
    let tasks = task_service(&conn);

    let project = projects.create_project(&ada, "Garden").unwrap();
    let task = tasks.create_task(&ada, project.id, "Buy seeds").unwrap();
    tasks.delete_task(&ada, task.id).unwrap();

    assert!(projects.project_detail(&ada, project.id).unwrap().tasks.is_empty());
    assert!(matches!(
        tasks.delete_task(&ada, task.id),
        Err(ServiceError::NotFound { entity: "task", .. })
    ));
}

#[test]
fn repository_updates_report_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    assert!(matches!(
        projects.update_project_text(99, "x"),
        Err(RepoError::NotFound { entity: "project", id: 99 })
    ));
    assert!(matches!(
        projects.delete_project(99),
        Err(RepoError::NotFound { entity: "project", id: 99 })
    ));
    assert!(matches!(
        tasks.update_task_text(7, "x"),
        Err(RepoError::NotFound { entity: "task", id: 7 })
    ));
}

#[test]
fn stats_count_only_the_callers_rows() {
    let conn = open_db_in_memory().unwrap();
    let ada = user(&conn, "ada");
    let bob = user(&conn, "bob");
    let projects = project_service(&conn);
    let tasks = task_service(&conn);

    let garden = projects.create_project(&ada, "Garden").unwrap();
    tasks.create_task(&ada, garden.id, "Buy seeds").unwrap();
    tasks.create_task(&ada, garden.id, "Dig beds").unwrap();
    projects.create_project(&bob, "Garage").unwrap();
    SqliteSuggestionRepository::try_new(&conn)
        .unwrap()
        .create_suggestion(&NewSuggestion {
            owner_id: ada.id,
            project_id: Some(garden.id),
            task_id: None,
            text: "Water daily".to_string(),
        })
        .unwrap();

    let stats = StatsService::new(
        SqliteProjectRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
        SqliteSuggestionRepository::try_new(&conn).unwrap(),
    );

    let for_ada = stats.stats(Some(&ada)).unwrap();
    assert_eq!(
        (for_ada.project_count, for_ada.task_count, for_ada.ai_suggestions_count),
        (1, 2, 1)
    );
    let for_bob = stats.stats(Some(&bob)).unwrap();
    assert_eq!(
        (for_bob.project_count, for_bob.task_count, for_bob.ai_suggestions_count),
        (1, 0, 0)
    );
    let anonymous = stats.stats(None).unwrap();
    assert_eq!(anonymous, Default::default());
}
