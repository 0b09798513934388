use embrya_api::ApiClient;
use embrya_app::session::{Session, UploadFile};
use embrya_core::models::patient::Patient;
use embrya_store::Store;
use uuid::Uuid;

fn patient(name: &str) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        cycle_number: 1,
        created_at: "2026-02-01T09:00:00Z".parse().unwrap(),
        age: None,
        audit_code: Some("PT-2026-0042".to_string()),
        assigned_doctor: None,
        contact_number: None,
        email: None,
        notes: None,
    }
}

/// A session wired to a backend nothing listens on. Upload attempts that
/// get past local validation fail at the connection, which is exactly what
/// the batch-abort tests need.
fn offline_session(dir: &std::path::Path) -> Session {
    let client = ApiClient::new("http://127.0.0.1:9");
    let store = Store::at(dir).unwrap();
    Session::with_parts(client, store)
}

#[test]
fn upload_without_active_patient_is_rejected_before_any_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = offline_session(dir.path());

    let files = vec![UploadFile {
        filename: "embryo.png".to_string(),
        bytes: vec![1, 2, 3],
    }];
    let err = session.upload_batch(&files, Some(5)).unwrap_err();
    assert!(err.to_string().contains("no active patient"));
}

#[test]
fn empty_batch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = offline_session(dir.path());
    let p = patient("Alice");
    let id = p.id;
    session.add_patient(p).unwrap();
    session.select_patient(Some(id)).unwrap();

    let err = session.upload_batch(&[], Some(5)).unwrap_err();
    assert!(err.to_string().contains("no files selected"));
}

#[test]
fn failed_batch_commits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = offline_session(dir.path());
    let p = patient("Alice");
    let id = p.id;
    session.add_patient(p).unwrap();
    session.select_patient(Some(id)).unwrap();

    let files = vec![UploadFile {
        filename: "embryo.png".to_string(),
        bytes: vec![1, 2, 3],
    }];
    // The backend is unreachable: the batch aborts, and nothing from it
    // lands in state.
    assert!(session.upload_batch(&files, Some(5)).is_err());
    assert!(session.state().embryos.is_empty());
}

#[test]
fn override_on_unknown_embryo_is_rejected_locally() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = offline_session(dir.path());

    let draft = embrya_core::models::overrides::ClinicalOverride {
        notes: Some("note".to_string()),
        ..Default::default()
    };
    assert!(session.submit_override(Uuid::new_v4(), &draft).is_err());
}

#[test]
fn state_round_trips_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let p = patient("Alice");
    let id = p.id;
    {
        let mut session = offline_session(dir.path());
        session.add_patient(p).unwrap();
        session.select_patient(Some(id)).unwrap();
    }

    // A fresh session over the same store sees the persisted state.
    let session = offline_session(dir.path());
    assert_eq!(session.state().patients.len(), 1);
    assert_eq!(session.state().active_patient_id, Some(id));
    assert_eq!(session.state().active_patient().unwrap().name, "Alice");
}
