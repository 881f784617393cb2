use peerpilot_core::model::{
    AttemptId, QuizAttempt, QuizSlug, ResourceId, SessionId, SessionRequestDraft, Topic,
};
use peerpilot_core::time::{fixed_clock, fixed_now};
use storage::keys::ATTEMPTS_KEY;
use storage::sqlite::SqliteBackend;
use storage::{KeyValueBackend, Storage};

fn attempt(correct: u32) -> QuizAttempt {
    QuizAttempt::new(
        AttemptId::generate(),
        QuizSlug::new("geometry-angles"),
        "Geometry Basics: Angles & Triangles",
        Topic::Geometry,
        correct,
        5,
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_backend_roundtrips_and_overwrites() {
    let backend = SqliteBackend::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    backend.migrate().await.expect("migrate");
    backend.migrate().await.expect("migrations are idempotent");

    assert_eq!(backend.get("missing").await.unwrap(), None);
    backend.set("k", "[1]").await.unwrap();
    backend.set("k", "[1,2]").await.unwrap();
    assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("[1,2]"));

    backend.remove("k").await.unwrap();
    backend.remove("k").await.unwrap();
    assert_eq!(backend.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_storage_persists_all_collections() {
    let url = "sqlite:file:memdb_storage_all?mode=memory&cache=shared";
    let storage = Storage::sqlite(url, fixed_clock()).await.expect("open");

    storage.attempts.add(attempt(4)).await;
    storage.rsvps.toggle(&SessionId::new("s2")).await;
    storage.saved_resources.toggle(&ResourceId::new("r3")).await;
    let draft = SessionRequestDraft {
        tutor_id: "britton-bloch".into(),
        tutor_name: "Britton Bloch".into(),
        topic: "Geometry".into(),
        goal: "Proof practice".into(),
        duration: "30 min".into(),
        day: "Tuesday".into(),
        time: "5:00 PM".into(),
        note: Some("Bring worksheet 4".into()),
    };
    storage
        .session_requests
        .add(draft.validate().unwrap())
        .await;

    // A second handle on the same database sees every write.
    let reopened = Storage::sqlite(url, fixed_clock()).await.expect("reopen");
    let attempts = reopened.attempts.all().await;
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score_percent(), 80);
    assert!(reopened.rsvps.all().await.is_attending(&SessionId::new("s2")));
    assert!(
        reopened
            .saved_resources
            .all()
            .await
            .contains(&ResourceId::new("r3"))
    );
    let requests = reopened.session_requests.all().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].details().note(), Some("Bring worksheet 4"));
    assert!(reopened.is_available());

    reopened.clear_all().await;
    assert!(storage.attempts.all().await.is_empty());
    assert!(storage.session_requests.all().await.is_empty());
}

#[tokio::test]
async fn sqlite_corrupted_value_reads_empty() {
    let backend = SqliteBackend::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    backend.migrate().await.expect("migrate");
    backend.set(ATTEMPTS_KEY, "<<not json>>").await.unwrap();

    let storage = Storage::sqlite(
        "sqlite:file:memdb_corrupt?mode=memory&cache=shared",
        fixed_clock(),
    )
    .await
    .expect("open");
    assert!(storage.attempts.all().await.is_empty());

    storage.attempts.add(attempt(5)).await;
    assert_eq!(storage.attempts.all().await.len(), 1);
}
