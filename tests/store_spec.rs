use ideaplan::models::{Graph, Idea};
use ideaplan::store::{self, ArtifactKind, ArtifactStore, FsStore, SqliteStore};
use speculate2::speculate;
use uuid::Uuid;

fn sample_idea() -> Idea {
    let mut idea = Idea::new("Build a todo app");
    idea.questions = vec!["Platform?".to_string(), "Auth?".to_string()];
    idea.answers.insert("Auth?".to_string(), "OAuth".to_string());
    idea.answers.insert("Platform?".to_string(), "web".to_string());
    idea
}

fn assert_round_trips_idea(store: &dyn ArtifactStore) {
    let idea = sample_idea();
    store::save_json(store, idea.id, ArtifactKind::Idea, &idea).expect("Failed to save idea");

    let loaded: Idea = store::load_json(store, idea.id, ArtifactKind::Idea)
        .expect("Load failed")
        .expect("Idea missing");
    assert_eq!(loaded, idea);
    let order: Vec<&str> = loaded.answers.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["Auth?", "Platform?"]);
}

fn assert_overwrite_replaces(store: &dyn ArtifactStore) {
    let id = Uuid::new_v4();
    store.put(id, ArtifactKind::Plan, b"# first").expect("put failed");
    store.put(id, ArtifactKind::Plan, b"# second").expect("put failed");

    let text = store::load_text(store, id, ArtifactKind::Plan)
        .expect("Load failed")
        .expect("Plan missing");
    assert_eq!(text, "# second");
}

fn assert_kinds_are_independent(store: &dyn ArtifactStore) {
    let id = Uuid::new_v4();
    store::save_json(store, id, ArtifactKind::Graph, &Graph { nodes: vec![], edges: vec![] }).expect("save failed");

    assert!(store.get(id, ArtifactKind::Graph).expect("get failed").is_some());
    assert!(store.get(id, ArtifactKind::Idea).expect("get failed").is_none());
    assert!(store.get(id, ArtifactKind::Plan).expect("get failed").is_none());
}

speculate! {
    describe "file store" {
        before {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let fs_store = FsStore::new(dir.path().join("ideas"), dir.path().join("plans"));
        }

        it "returns None for a missing artifact" {
            let found = fs_store.get(Uuid::new_v4(), ArtifactKind::Idea).expect("get failed");
            assert!(found.is_none());
        }

        it "round-trips an idea with ordered answers" {
            assert_round_trips_idea(&fs_store);
        }

        it "replaces an artifact on overwrite" {
            assert_overwrite_replaces(&fs_store);
        }

        it "keeps artifact kinds apart" {
            assert_kinds_are_independent(&fs_store);
        }

        it "lays files out per idea" {
            let id = Uuid::new_v4();
            fs_store.put(id, ArtifactKind::Idea, b"{}").expect("put failed");
            fs_store.put(id, ArtifactKind::Graph, b"{}").expect("put failed");
            fs_store.put(id, ArtifactKind::Plan, b"# plan").expect("put failed");

            assert!(dir.path().join("ideas").join(format!("{}.json", id)).is_file());
            assert!(dir.path().join("ideas").join(format!("{}_graph.json", id)).is_file());
            assert!(dir.path().join("plans").join(format!("{}.md", id)).is_file());
        }

        it "reports corrupt JSON as an error rather than a missing artifact" {
            let id = Uuid::new_v4();
            fs_store.put(id, ArtifactKind::Idea, b"not json").expect("put failed");
            let result = store::load_json::<Idea>(&fs_store, id, ArtifactKind::Idea);
            assert!(result.is_err());
        }
    }

    describe "sqlite store" {
        before {
            let db = SqliteStore::open_memory().expect("Failed to create in-memory database");
            db.migrate().expect("Failed to run migrations");
        }

        it "returns None for a missing artifact" {
            let found = db.get(Uuid::new_v4(), ArtifactKind::Graph).expect("get failed");
            assert!(found.is_none());
        }

        it "round-trips an idea with ordered answers" {
            assert_round_trips_idea(&db);
        }

        it "replaces an artifact on overwrite" {
            assert_overwrite_replaces(&db);
        }

        it "keeps artifact kinds apart" {
            assert_kinds_are_independent(&db);
        }

        it "can be migrated twice" {
            db.migrate().expect("Second migration failed");
        }

        it "persists across reopening a database file" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("ideaplan.db");
            let id = Uuid::new_v4();
            {
                let first = SqliteStore::open(path.clone()).expect("open failed");
                first.migrate().expect("migrate failed");
                first.put(id, ArtifactKind::Plan, b"# kept").expect("put failed");
            }
            let second = SqliteStore::open(path).expect("reopen failed");
            second.migrate().expect("migrate failed");
            let text = store::load_text(&second, id, ArtifactKind::Plan).expect("load failed");
            assert_eq!(text.as_deref(), Some("# kept"));
        }
    }
}
