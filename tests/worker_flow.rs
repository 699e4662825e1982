use ecocampus::app::{handle_event, Action, AppState, Event, FeedStatus};
use ecocampus::domain::validation::ArticleForm;
use ecocampus::domain::{ArticleId, Role, UserSession};
use ecocampus::storage::{ArticlePayload, ArticleStore, JsonStorage, SessionStore};
use ecocampus::worker::{spawn_worker, StoreWorker, WorkerHandle};
use ecocampus::Config;

/// Executes `actions`, then handles every worker response they cause.
/// Returns the alerts shown along the way.
fn pump(state: &mut AppState, worker: &WorkerHandle, actions: Vec<Action>) -> Vec<(String, String)> {
    let mut alerts = Vec::new();
    let mut queue = actions;
    let mut pending = 0;

    loop {
        for action in queue.drain(..) {
            match action {
                Action::PostToWorker(message) => {
                    worker.post(message).unwrap();
                    pending += 1;
                }
                Action::ShowAlert { title, message } => alerts.push((title, message)),
                Action::NavigateToArticle(_) | Action::NavigateToLogin => {}
            }
        }
        if pending == 0 {
            return alerts;
        }
        let response = worker.recv().unwrap();
        pending -= 1;
        let (_, actions) = handle_event(state, &Event::WorkerResponse(response)).unwrap();
        queue = actions;
    }
}

fn send(state: &mut AppState, worker: &WorkerHandle, event: Event) -> Vec<(String, String)> {
    let (_, actions) = handle_event(state, &event).unwrap();
    pump(state, worker, actions)
}

fn payload(title: &str, category: &str, date: &str, featured: bool, is_new: bool) -> ArticlePayload {
    ArticlePayload {
        title: title.to_string(),
        content: format!("{title} contenido"),
        category: category.to_string(),
        image_url: "https://img.example/a.png".to_string(),
        date: date.to_string(),
        featured,
        is_new,
        ..ArticlePayload::default()
    }
}

fn seeded_config(dir: &tempfile::TempDir, admin: bool) -> Config {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    // The user directory is maintained outside the client; seed it in the file.
    std::fs::write(
        config.storage_path(),
        r#"{"version": 1, "users": [
            {"id": "u1", "nombre": "Ana", "email": "ana@alumnos.udg.mx", "role": "admin"},
            {"id": "u2", "nombre": "Luis Pérez", "email": "luis@alumnos.udg.mx", "role": "user"}
        ]}"#,
    )
    .unwrap();

    let mut storage = JsonStorage::new(config.storage_path()).unwrap();
    for article in [
        payload("Pilas", "Reciclaje", "01 ENE 2024", true, false),
        payload("Huerto", "Composta", "01 ENE 2020", false, true),
        payload("PET", "Reciclaje", "01 ENE 2025", false, false),
    ] {
        storage.create_article(&article).unwrap();
    }

    let mut session = UserSession::new("u1", "ana@alumnos.udg.mx", "Ana");
    if admin {
        session.role = Role::Admin;
    }
    storage.save_session(&session).unwrap();
    drop(storage);

    config
}

fn start(config: &Config) -> (AppState, WorkerHandle) {
    let worker = spawn_worker(StoreWorker::open(config).unwrap()).unwrap();
    let mut state = ecocampus::initialize(config);
    let (_, actions) = handle_event(&mut state, &Event::Refresh).unwrap();
    let mut actions = actions;
    actions.push(Action::PostToWorker(ecocampus::worker::WorkerMessage::load_session()));
    pump(&mut state, &worker, actions);
    (state, worker)
}

fn titles(state: &AppState) -> Vec<String> {
    state.articles.iter().map(|a| a.title.clone()).collect()
}

#[test]
fn feed_loads_ranked_from_json_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, false);
    let (state, worker) = start(&config);

    assert_eq!(state.status, FeedStatus::Ready);
    assert_eq!(titles(&state), vec!["Huerto", "Pilas", "PET"]);
    assert_eq!(state.categories, vec!["Todos", "Composta", "Reciclaje"]);
    assert_eq!(state.display_name(), "Ana");

    worker.shutdown().unwrap();
}

#[test]
fn opening_an_article_counts_a_view_and_loads_related() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, false);
    let (mut state, worker) = start(&config);

    send(&mut state, &worker, Event::OpenArticle(ArticleId::Number(1)));

    let selected = state.selected_article.as_ref().unwrap();
    assert_eq!(selected.views, 1);
    let related: Vec<String> = state.related.iter().map(|a| a.id.to_string()).collect();
    assert_eq!(related, vec!["3"]);

    worker.shutdown().unwrap();
}

#[test]
fn regular_users_cannot_delete() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, false);
    let (mut state, worker) = start(&config);

    let alerts = send(&mut state, &worker, Event::DeleteArticle(ArticleId::Number(1)));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Access denied");
    assert_eq!(state.articles.len(), 3);

    worker.shutdown().unwrap();
}

#[test]
fn admin_changes_persist_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, true);
    let (mut state, worker) = start(&config);
    assert!(state.is_admin());

    let form = ArticleForm {
        title: "Nuevo punto limpio".to_string(),
        content: "Abre el lunes".to_string(),
        category: "Reciclaje".to_string(),
        image_url: "https://img.example/b.png".to_string(),
        date: "23 ABR 2025".to_string(),
        is_new: true,
        ..ArticleForm::default()
    };
    let alerts = send(&mut state, &worker, Event::SaveArticle { id: None, form });
    assert_eq!(alerts, vec![("Success".to_string(), "Article created successfully".to_string())]);
    assert_eq!(state.articles[0].title, "Nuevo punto limpio");
    assert_eq!(state.articles[0].id, ArticleId::Number(4));

    let alerts = send(&mut state, &worker, Event::DeleteArticle(ArticleId::Number(2)));
    assert_eq!(alerts[0].0, "Success");
    assert_eq!(state.articles.len(), 3);

    let alerts = send(&mut state, &worker, Event::DeleteArticle(ArticleId::Number(99)));
    assert_eq!(alerts[0].0, "Error");

    worker.shutdown().unwrap();

    let (state, worker) = start(&config);
    assert_eq!(titles(&state), vec!["Nuevo punto limpio", "Pilas", "PET"]);
    worker.shutdown().unwrap();
}

#[test]
fn logout_clears_the_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, false);
    let (mut state, worker) = start(&config);

    send(&mut state, &worker, Event::Logout);
    assert!(state.session.is_none());
    assert_eq!(state.display_name(), "Usuario");
    worker.shutdown().unwrap();

    let (state, worker) = start(&config);
    assert!(state.session.is_none());
    worker.shutdown().unwrap();
}

#[test]
fn admin_lists_and_searches_users() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, true);
    let (mut state, worker) = start(&config);

    let alerts = send(&mut state, &worker, Event::OpenUserManagement);
    assert!(alerts.is_empty());
    assert_eq!(state.users.all.len(), 2);
    assert_eq!(state.users.all[1].initials(), "LP");
    assert_eq!(state.users.all[0].role, Role::Admin);

    send(&mut state, &worker, Event::SearchUsers("PÉREZ".to_string()));
    assert_eq!(state.users.visible.len(), 1);
    assert_eq!(state.users.visible[0].email, "luis@alumnos.udg.mx");

    worker.shutdown().unwrap();
}

#[test]
fn regular_users_cannot_list_users() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, false);
    let (mut state, worker) = start(&config);

    let alerts = send(&mut state, &worker, Event::OpenUserManagement);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Access denied");
    assert!(state.users.all.is_empty());

    worker.shutdown().unwrap();
}

#[test]
fn failed_save_does_not_show_up_in_the_feed() {
    let dir = tempfile::tempdir().unwrap();
    let config = seeded_config(&dir, true);
    let (mut state, worker) = start(&config);

    let path = config.storage_path();
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    let form = ArticleForm {
        title: "Nunca guardado".to_string(),
        content: "x".to_string(),
        category: "Reciclaje".to_string(),
        image_url: "https://img.example/c.png".to_string(),
        date: "23 ABR 2025".to_string(),
        ..ArticleForm::default()
    };
    let alerts = send(&mut state, &worker, Event::SaveArticle { id: None, form });
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Error");
    assert!(!state.editor.saving);

    send(&mut state, &worker, Event::Refresh);
    assert_eq!(titles(&state), vec!["Huerto", "Pilas", "PET"]);

    worker.shutdown().unwrap();
}
