use expotax_core::{
    InMemoryRemote, Level, NodeDraft, RemoteNode, RemoteOp, RemoteResult, RemoteTaxonomy,
    ServiceError, TaxonomyService,
};
use std::cell::RefCell;

/// Delegating remote that records every issued call, in the spirit of the
/// engine's other test doubles.
struct RecordingRemote {
    inner: InMemoryRemote,
    calls: RefCell<Vec<String>>,
}

impl RecordingRemote {
    fn new(depth: usize) -> Self {
        Self {
            inner: InMemoryRemote::new(depth),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, op: &str, level: Level) {
        self.calls.borrow_mut().push(format!("{op}@{level}"));
    }
}

impl RemoteTaxonomy for RecordingRemote {
    fn create(&self, level: Level, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        self.record("create", level);
        self.inner.create(level, draft)
    }

    fn update(&self, level: Level, code: &str, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        self.record("update", level);
        self.inner.update(level, code, draft)
    }

    fn delete(&self, level: Level, code: &str) -> RemoteResult<()> {
        self.record("delete", level);
        self.inner.delete(level, code)
    }

    fn list(&self, level: Level) -> RemoteResult<Vec<RemoteNode>> {
        self.record("list", level);
        self.inner.list(level)
    }
}

fn seeded_service() -> (TaxonomyService<InMemoryRemote>, String, String, String) {
    let mut service = TaxonomyService::new(InMemoryRemote::new(3), 3);
    let linea = service.create(0, "IA", None).expect("línea");
    let sublinea = service
        .create(1, "Deep Learning", Some(&linea.code))
        .expect("sublínea");
    let area = service
        .create(2, "Redes Neuronales", Some(&sublinea.code))
        .expect("área");
    (service, linea.code, sublinea.code, area.code)
}

#[test]
fn create_assigns_remote_code_and_updates_index() {
    let (service, linea, sublinea, _) = seeded_service();

    assert_eq!(service.store().len(0), 1);
    assert_eq!(service.index().children(0, &linea), [sublinea.clone()]);
    let hits = service.search(1, "deep");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, sublinea);
}

#[test]
fn create_validates_parent_before_any_remote_call() {
    let remote = RecordingRemote::new(3);
    let mut service = TaxonomyService::new(remote, 3);

    let err = service
        .create(1, "Huérfana", Some("no-such-linea"))
        .expect_err("missing parent should fail locally");
    assert!(matches!(err, ServiceError::ParentNotFound(_)));

    let err = service
        .create(1, "Sin padre", None)
        .expect_err("non-root create requires a parent");
    assert!(matches!(err, ServiceError::ParentRequired(1)));

    let err = service
        .create(0, "Raíz", Some("X"))
        .expect_err("root create must not carry a parent");
    assert!(matches!(err, ServiceError::ParentNotAllowed(0)));

    // None of the rejected drafts reached the collaborator.
    assert!(service.store().is_empty());
}

#[test]
fn blank_names_are_rejected() {
    let mut service = TaxonomyService::new(InMemoryRemote::new(1), 1);
    let err = service.create(0, "   ", None).expect_err("blank name");
    assert_eq!(err, ServiceError::InvalidName);
}

#[test]
fn remote_rejection_leaves_store_untouched() {
    let remote = InMemoryRemote::new(3);
    let mut service = TaxonomyService::new(&remote, 3);
    let linea = service.create(0, "IA", None).expect("línea");
    let sublinea = service
        .create(1, "Deep Learning", Some(&linea.code))
        .expect("sublínea");

    remote.reject_next(RemoteOp::Update, "backend caído");
    let err = service
        .rename(0, &linea.code, "Inteligencia Artificial")
        .expect_err("queued rejection should surface");
    assert!(matches!(err, ServiceError::Remote(_)));
    assert_eq!(
        service.store().get(0, &linea.code).expect("node intact").name,
        "IA"
    );

    remote.reject_next(RemoteOp::Delete, "prohibido");
    let err = service
        .delete(0, &linea.code)
        .expect_err("rejected delete must not cascade locally");
    assert!(matches!(err, ServiceError::Remote(_)));
    assert!(service.store().get(0, &linea.code).is_some());
    assert!(service.store().get(1, &sublinea.code).is_some());
}

#[test]
fn delete_issues_one_remote_call_for_the_cascade_root() {
    let remote = RecordingRemote::new(3);
    let mut service = TaxonomyService::new(&remote, 3);
    let linea = service.create(0, "IA", None).expect("línea");
    service
        .create(1, "Deep Learning", Some(&linea.code))
        .expect("sublínea");

    let removed = service.delete(0, &linea.code).expect("cascade");
    assert_eq!(removed.len(), 2);
    assert!(service.store().is_empty());

    // Exactly one delete went over the wire, for the cascade root; the
    // backend owns cascading its own storage.
    let calls = remote.calls.borrow();
    let deletes: Vec<&String> = calls.iter().filter(|call| call.starts_with("delete")).collect();
    assert_eq!(deletes, vec![&"delete@0".to_string()]);
    assert!(remote.inner.is_empty());
}

#[test]
fn rename_keeps_position_and_parent() {
    let (mut service, _, sublinea, area) = seeded_service();

    let renamed = service
        .rename(1, &sublinea, "Aprendizaje Profundo")
        .expect("rename");
    assert_eq!(renamed.code, sublinea);
    assert_eq!(
        service.store().get(1, &sublinea).expect("node").name,
        "Aprendizaje Profundo"
    );
    // The área still hangs off the renamed sublínea.
    let chain = service
        .store()
        .ancestry_of(2, &area)
        .expect("chain survives rename");
    assert_eq!(chain[1].name, "Aprendizaje Profundo");
    // Search sees the new name immediately.
    assert_eq!(service.search(2, "aprendizaje").len(), 1);
}

#[test]
fn reparent_moves_node_and_descendants() {
    let (mut service, _, _, area) = seeded_service();
    let otra = service.create(0, "Robótica", None).expect("otra línea");
    let nueva_sub = service
        .create(1, "Percepción", Some(&otra.code))
        .expect("sublínea nueva");

    let moved = service
        .reparent(2, &area, &nueva_sub.code)
        .expect("reparent área");
    assert_eq!(moved.parent_code.as_deref(), Some(nueva_sub.code.as_str()));

    let chain = service.store().ancestry_of(2, &area).expect("new chain");
    assert_eq!(chain[0].code, otra.code);

    let err = service
        .reparent(0, &otra.code, "X")
        .expect_err("root cannot be reparented");
    assert_eq!(err, ServiceError::ParentNotAllowed(0));
}

#[test]
fn delete_of_missing_node_fails_before_remote_phase() {
    let (mut service, _, _, _) = seeded_service();
    let err = service
        .delete(1, "no-such-code")
        .expect_err("missing node should fail");
    assert!(matches!(err, ServiceError::NodeNotFound(_)));
}

#[test]
fn hydrate_loads_every_level_root_first() {
    let remote = InMemoryRemote::new(3);
    let linea = remote
        .create(0, &NodeDraft::new("IA", None))
        .expect("seed línea");
    let sublinea = remote
        .create(1, &NodeDraft::new("Deep Learning", Some(linea.code.clone())))
        .expect("seed sublínea");
    remote
        .create(2, &NodeDraft::new("Redes", Some(sublinea.code.clone())))
        .expect("seed área");

    let mut service = TaxonomyService::new(remote, 3);
    service.hydrate().expect("hydrate");

    assert_eq!(service.store().len(0), 1);
    assert_eq!(service.store().len(1), 1);
    assert_eq!(service.store().len(2), 1);
    assert_eq!(
        service.index().children(0, &linea.code),
        [sublinea.code.clone()]
    );
}
