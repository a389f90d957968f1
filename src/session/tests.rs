//! Session Controller Tests
//!
//! Drives `TreeSession` against the in-memory server and cache.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::SessionConfig;
    use crate::domain::{ItemDraft, ItemId, TreeError};
    use crate::repository::{Call, MemoryCache, MemoryPersistence, Persistence, TreeCache};
    use crate::session::{ClipboardMode, DropTarget, ImportMode, OpState, Outcome, PasteOutcome, TreeSession};
    use crate::sync::TabChannel;
    use crate::tree;

    type Session = TreeSession<MemoryPersistence, Arc<MemoryCache>>;

    fn setup() -> (Session, MemoryPersistence, Arc<MemoryCache>) {
        setup_with(SessionConfig::default())
    }

    fn setup_with(config: SessionConfig) -> (Session, MemoryPersistence, Arc<MemoryCache>) {
        let server = MemoryPersistence::new();
        let cache = Arc::new(MemoryCache::new());
        let session = TreeSession::new(server.clone(), cache.clone(), config);
        (session, server, cache)
    }

    fn labels_under(session: &Session, parent: Option<&ItemId>) -> Vec<String> {
        let nodes = match parent {
            Some(id) => session.find(id).unwrap().children().to_vec(),
            None => session.tree().roots().to_vec(),
        };
        nodes.iter().map(|n| n.label.clone()).collect()
    }

    #[tokio::test]
    async fn test_add_item_confirms_server_id() {
        let (mut session, server, _) = setup();
        let work = session.add_item(ItemDraft::folder("Work"), None).await.unwrap();
        let plan = session.add_item(ItemDraft::note("Plan"), Some(&work)).await.unwrap();

        assert!(!work.is_transient());
        assert!(!plan.is_transient());
        assert!(session.tree().ids().iter().all(|id| !id.is_transient()));
        assert_eq!(session.selection(), Some(&plan));
        assert!(session.is_expanded(&work));
        assert_eq!(server.tree().await.item_count(), 2);
    }

    #[tokio::test]
    async fn test_add_rejections_touch_nothing() {
        let (mut session, server, _) = setup();
        let work = session.add_item(ItemDraft::folder("Work"), None).await.unwrap();
        let note = session.add_item(ItemDraft::note("n"), Some(&work)).await.unwrap();
        server.clear_calls().await;
        let before = session.tree().clone();

        assert!(matches!(
            session.add_item(ItemDraft::folder("  "), None).await,
            Err(TreeError::InvalidInput(_))
        ));
        assert_eq!(
            session.add_item(ItemDraft::note("Loose"), None).await,
            Err(TreeError::RootConstraintViolation)
        );
        assert_eq!(
            session.add_item(ItemDraft::note("x"), Some(&ItemId::from("nope"))).await,
            Err(TreeError::NotFound(ItemId::from("nope")))
        );
        assert_eq!(
            session.add_item(ItemDraft::note("x"), Some(&note)).await,
            Err(TreeError::NotAFolder(note.clone()))
        );
        assert_eq!(
            session.add_item(ItemDraft::folder(" work "), None).await,
            Err(TreeError::NameConflict { label: "work".into() })
        );

        assert_eq!(session.tree(), &before);
        assert!(server.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_quota_blocks_before_mutation() {
        let config = SessionConfig {
            item_limit: Some(3),
            ..SessionConfig::default()
        };
        let (mut session, server, _) = setup_with(config);
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        session.add_item(ItemDraft::note("one"), Some(&a)).await.unwrap();
        server.clear_calls().await;

        // Duplicating A would add two more.
        assert_eq!(
            session.duplicate_item(&a).await,
            Err(TreeError::QuotaExceeded { limit: 3 })
        );
        session.add_item(ItemDraft::note("two"), Some(&a)).await.unwrap();
        assert_eq!(
            session.add_item(ItemDraft::note("three"), Some(&a)).await,
            Err(TreeError::QuotaExceeded { limit: 3 })
        );
        assert_eq!(server.calls().await.len(), 1);

        let (mut admin, _, _) = setup_with(SessionConfig::for_account(true));
        for i in 0..120 {
            admin.add_item(ItemDraft::folder(format!("f{i}")), None).await.unwrap();
        }
        assert_eq!(admin.tree().item_count(), 120);
    }

    #[tokio::test]
    async fn test_rename() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let x = session.add_item(ItemDraft::note("x"), Some(&a)).await.unwrap();
        session.add_item(ItemDraft::note("y"), Some(&a)).await.unwrap();

        assert_eq!(
            session.rename_item(&x, "Y").await,
            Err(TreeError::NameConflict { label: "Y".into() })
        );
        server.clear_calls().await;
        session.rename_item(&x, "x").await.unwrap();
        assert!(server.calls().await.is_empty());

        // Case-only change against itself is allowed.
        session.rename_item(&x, "X").await.unwrap();
        assert_eq!(session.find(&x).unwrap().label, "X");
        assert_eq!(tree::find_by_id(server.tree().await.roots(), &x).unwrap().label, "X");
    }

    #[tokio::test]
    async fn test_delete_clears_selection_and_cut() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("n"), Some(&a)).await.unwrap();
        session.cut_item(&n).unwrap();
        session.select(Some(&n)).unwrap();

        session.delete_item(&a).await.unwrap();
        assert!(session.tree().is_empty());
        assert_eq!(session.selection(), None);
        assert!(session.clipboard().is_none());
        assert!(server.tree().await.is_empty());

        assert_eq!(session.delete_item(&a).await, Err(TreeError::NotFound(a.clone())));
    }

    #[tokio::test]
    async fn test_copy_clipboard_survives_delete() {
        let (mut session, _, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        session.copy_item(&a).unwrap();
        session.delete_item(&a).await.unwrap();

        let clip = session.clipboard().unwrap();
        assert_eq!(clip.mode(), ClipboardMode::Copy);
        let id = match session.paste_item(None).await.unwrap() {
            PasteOutcome::Pasted(id) => id,
            other => panic!("expected a fresh copy, got {other:?}"),
        };
        assert_eq!(session.find(&id).unwrap().label, "A");
    }

    #[tokio::test]
    async fn test_copy_paste_takes_copy_label() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("Report"), Some(&a)).await.unwrap();
        session.copy_item(&n).unwrap();

        session.paste_item(Some(&a)).await.unwrap();
        session.paste_item(Some(&a)).await.unwrap();
        assert_eq!(
            labels_under(&session, Some(&a)),
            vec!["Report", "Report (copy)", "Report (copy 2)"]
        );
        assert!(session.clipboard().is_some());
        assert_eq!(server.tree().await.item_count(), 4);

        assert_eq!(session.paste_item(None).await, Err(TreeError::RootConstraintViolation));
    }

    #[tokio::test]
    async fn test_cut_paste_moves() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let b = session.add_item(ItemDraft::folder("B"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("n"), Some(&a)).await.unwrap();
        session.cut_item(&n).unwrap();

        assert_eq!(session.paste_item(Some(&b)).await, Ok(PasteOutcome::Moved));
        assert!(session.clipboard().is_none());
        assert!(tree::is_in_parent(session.tree(), &n, Some(&b)));
        assert!(tree::is_in_parent(&server.tree().await, &n, Some(&b)));
        assert!(matches!(server.calls().await.last(), Some(Call::Move { .. })));

        assert!(matches!(
            session.paste_item(Some(&a)).await,
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_cut_paste_collision_is_conflict() {
        let (mut session, _, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let b = session.add_item(ItemDraft::folder("B"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("Same"), Some(&a)).await.unwrap();
        session.add_item(ItemDraft::note("same"), Some(&b)).await.unwrap();
        session.cut_item(&n).unwrap();

        assert_eq!(
            session.paste_item(Some(&b)).await,
            Err(TreeError::NameConflict { label: "Same".into() })
        );
        assert!(session.clipboard().is_some());
    }

    #[tokio::test]
    async fn test_move_into_same_parent_is_noop() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("n"), Some(&a)).await.unwrap();
        server.clear_calls().await;
        let revision = session.history().revision();

        session.move_item(&n, Some(&a)).await.unwrap();
        assert!(server.calls().await.is_empty());
        assert_eq!(session.history().revision(), revision);
    }

    #[tokio::test]
    async fn test_move_sends_index() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let b = session.add_item(ItemDraft::folder("B"), None).await.unwrap();
        session.add_item(ItemDraft::note("a note"), Some(&b)).await.unwrap();
        session.add_item(ItemDraft::note("z note"), Some(&b)).await.unwrap();
        let m = session.add_item(ItemDraft::note("m note"), Some(&a)).await.unwrap();
        server.clear_calls().await;

        session.move_item(&m, Some(&b)).await.unwrap();
        assert_eq!(
            server.calls().await,
            vec![Call::Move {
                id: m.clone(),
                new_parent: Some(b.clone()),
                new_index: 1,
            }]
        );
        assert_eq!(session.move_item(&a, Some(&a)).await, Err(TreeError::CycleDetected));
        assert_eq!(session.move_item(&m, None).await, Err(TreeError::RootConstraintViolation));
    }

    #[tokio::test]
    async fn test_drag_state_always_cleared() {
        let (mut session, _, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let sub = session.add_item(ItemDraft::folder("Sub"), Some(&a)).await.unwrap();

        session.begin_drag(&a).unwrap();
        assert!(!session.hover(DropTarget::Folder(sub.clone())));
        assert!(session.drag().hovered().is_some());
        assert_eq!(
            session.drop_on(DropTarget::Folder(sub.clone())).await,
            Err(TreeError::CycleDetected)
        );
        assert!(!session.drag().is_dragging());

        session.begin_drag(&sub).unwrap();
        assert!(session.hover(DropTarget::Root));
        session.drop_on(DropTarget::Root).await.unwrap();
        assert!(!session.drag().is_dragging());
        assert_eq!(labels_under(&session, None), vec!["A", "Sub"]);

        session.begin_drag(&a).unwrap();
        session.end_drag();
        assert!(!session.drag().is_dragging());
        assert!(matches!(
            session.drop_on(DropTarget::Root).await,
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_content_and_completion() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let t = session.add_item(ItemDraft::task("Ship"), Some(&a)).await.unwrap();

        assert!(session.toggle_completed(&t).await.unwrap());
        session.update_content(&t, "<p>done</p>").await.unwrap();
        let stored = server.tree().await;
        let task = tree::find_by_id(stored.roots(), &t).unwrap();
        assert_eq!(task.completed(), Some(true));
        assert_eq!(task.content(), Some("<p>done</p>"));
        assert!(session.find(&t).unwrap().updated_at.is_some());

        assert!(matches!(session.toggle_completed(&a).await, Err(TreeError::InvalidInput(_))));
        assert!(matches!(session.update_content(&a, "x").await, Err(TreeError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_failed_request_is_reverted() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let before = session.tree().clone();

        server.fail_next(1).await;
        let err = session.add_item(ItemDraft::note("lost"), Some(&a)).await.unwrap_err();
        assert!(matches!(err, TreeError::Network(_)));
        assert_eq!(session.tree(), &before);
        assert_eq!(session.selection(), None);

        server.fail_next(1).await;
        assert!(session.rename_item(&a, "B").await.is_err());
        assert_eq!(session.find(&a).unwrap().label, "A");
    }

    #[tokio::test]
    async fn test_begin_dispatch_settle() {
        let (mut session, server, _) = setup();
        let mut op = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();
        let local = op.created_id().cloned().unwrap();
        assert!(local.is_transient());
        assert!(session.find(&local).is_some());
        assert_eq!(op.state(), OpState::Pending);

        let result = session.dispatch(&op).await;
        let outcome = session.settle(&mut op, result).await.unwrap();
        assert!(matches!(outcome, Outcome::Created(_)));
        assert_eq!(op.state(), OpState::Confirmed);
        assert!(session.find(&local).is_none());

        let again = session.dispatch(&op).await;
        assert!(matches!(
            session.settle(&mut op, again).await,
            Err(TreeError::InvalidInput(_))
        ));
        assert_eq!(server.tree().await.item_count(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_ops() {
        let (mut session, server, _) = setup();
        let mut first = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();
        let parent = first.created_id().cloned().unwrap();
        let mut second = session.begin_add_item(ItemDraft::note("n"), Some(&parent)).unwrap();
        assert_eq!(session.tree().item_count(), 2);

        // The child request is built against the parent's transient id.
        let r1 = session.dispatch(&first).await;
        session.settle(&mut first, r1).await.unwrap();
        let r2 = session.dispatch(&second).await;
        session.settle(&mut second, r2).await.unwrap();

        let stored = server.tree().await;
        assert_eq!(stored.item_count(), 2);
        assert_eq!(stored.roots()[0].children().len(), 1);
        assert_eq!(session.tree(), &stored);
    }

    #[tokio::test]
    async fn test_stale_revert_falls_back_to_reload() {
        let (mut session, server, _) = setup();
        session.add_item(ItemDraft::folder("Kept"), None).await.unwrap();

        let mut first = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();
        let _second = session.begin_add_item(ItemDraft::folder("B"), None).unwrap();
        server.fail_next(1).await;
        let result = session.dispatch(&first).await;
        assert!(session.settle(&mut first, result).await.is_err());

        assert_eq!(first.state(), OpState::Reverted);
        assert_eq!(labels_under(&session, None), vec!["Kept"]);
        assert!(!session.can_undo());
    }

    #[tokio::test]
    async fn test_revert_keeps_ids_confirmed_meanwhile() {
        let (mut session, server, _) = setup();
        let kept = session.add_item(ItemDraft::folder("Kept"), None).await.unwrap();

        let mut add = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();
        let mut rename = session.begin_rename_item(&kept, "K2").unwrap().unwrap();

        let r1 = session.dispatch(&add).await;
        let Outcome::Created(created) = session.settle(&mut add, r1).await.unwrap() else {
            panic!("add should confirm a create");
        };
        let a = created.values().next().unwrap().id.clone();

        server.fail_next(1).await;
        let r2 = session.dispatch(&rename).await;
        assert!(matches!(
            session.settle(&mut rename, r2).await,
            Err(TreeError::Network(_))
        ));

        assert!(session.find(&a).is_some());
        assert!(session.tree().ids().iter().all(|id| !id.is_transient()));
        assert_eq!(session.find(&kept).unwrap().label, "Kept");
        assert_eq!(session.tree(), &server.tree().await);
    }

    #[tokio::test]
    async fn test_late_confirmation_after_reload() {
        let (mut session, server, _) = setup();
        let kept = session.add_item(ItemDraft::folder("Kept"), None).await.unwrap();

        let mut rename = session.begin_rename_item(&kept, "K2").unwrap().unwrap();
        let mut add = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();

        // The rename fails first; history moved on, so the session reloads
        // and the optimistic add is dropped locally.
        server.fail_next(1).await;
        let r1 = session.dispatch(&rename).await;
        assert!(session.settle(&mut rename, r1).await.is_err());
        assert_eq!(labels_under(&session, None), vec!["Kept"]);

        let r2 = session.dispatch(&add).await;
        session.settle(&mut add, r2).await.unwrap();
        assert_eq!(labels_under(&session, None), vec!["A", "Kept"]);
        assert_eq!(session.tree(), &server.tree().await);
    }

    #[tokio::test]
    async fn test_resolved_ids_dropped_when_idle() {
        let (mut session, server, _) = setup();
        let mut first = session.begin_add_item(ItemDraft::folder("A"), None).unwrap();
        let mut second = session.begin_add_item(ItemDraft::folder("B"), None).unwrap();
        let a_local = first.created_id().cloned().unwrap();
        let mut third = session.begin_add_item(ItemDraft::note("n"), Some(&a_local)).unwrap();
        assert_eq!(session.in_flight(), 3);

        let r = session.dispatch(&first).await;
        session.settle(&mut first, r).await.unwrap();
        let r = session.dispatch(&second).await;
        let Outcome::Created(created) = session.settle(&mut second, r).await.unwrap() else {
            panic!("add should confirm a create");
        };
        assert_eq!(session.resolved_len(), 2);

        // Entries for items gone from the server are pruned on reload.
        let b = created.values().next().unwrap().id.clone();
        server.delete_item(&b).await.unwrap();
        session.reload().await.unwrap();
        assert_eq!(session.resolved_len(), 1);

        // The pending child still resolves its parent's server id.
        let r = session.dispatch(&third).await;
        session.settle(&mut third, r).await.unwrap();
        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.resolved_len(), 0);
        assert_eq!(session.tree(), &server.tree().await);
    }

    #[tokio::test]
    async fn test_partial_subtree_failure_reloads() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        session.add_item(ItemDraft::note("one"), Some(&a)).await.unwrap();
        session.add_item(ItemDraft::note("two"), Some(&a)).await.unwrap();

        server.fail_after(1, 1).await;
        assert!(session.duplicate_item(&a).await.is_err());
        // The copied folder reached the server; the local tree now mirrors it.
        assert_eq!(session.tree(), &server.tree().await);
        assert_eq!(labels_under(&session, None), vec!["A", "A (copy)"]);
    }

    #[tokio::test]
    async fn test_undo_redo_pushes_tree() {
        let (mut session, server, _) = setup();
        session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        session.add_item(ItemDraft::folder("B"), None).await.unwrap();

        assert!(session.undo().await.unwrap());
        assert_eq!(labels_under(&session, None), vec!["A"]);
        assert_eq!(server.tree().await.item_count(), 1);
        assert!(matches!(server.calls().await.last(), Some(Call::ReplaceTree)));

        assert!(session.redo().await.unwrap());
        assert_eq!(labels_under(&session, None), vec!["A", "B"]);
        assert_eq!(server.tree().await.item_count(), 2);
        assert!(!session.redo().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_undo_reloads() {
        let (mut session, server, _) = setup();
        session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        server.fail_next(1).await;
        assert!(session.undo().await.is_err());
        assert_eq!(labels_under(&session, None), vec!["A"]);
        assert!(!session.can_undo());
    }

    #[tokio::test]
    async fn test_cross_tab_reload() {
        let server = MemoryPersistence::new();
        let channel = TabChannel::new("notes-tree-sync");
        let mut left = TreeSession::new(server.clone(), MemoryCache::new(), SessionConfig::default())
            .with_tabs(&channel);
        let mut right = TreeSession::new(server.clone(), MemoryCache::new(), SessionConfig::default())
            .with_tabs(&channel);
        assert_ne!(left.tab_id(), right.tab_id());

        left.add_item(ItemDraft::folder("Shared"), None).await.unwrap();
        assert!(!left.poll_signals().await.unwrap());
        assert!(right.tree().is_empty());
        assert!(right.poll_signals().await.unwrap());
        assert_eq!(right.tree(), left.tree());
        assert!(!right.poll_signals().await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_restores_session() {
        let (mut session, server, cache) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        session.add_item(ItemDraft::folder("Sub"), Some(&a)).await.unwrap();
        assert!(cache.read("notesTree").unwrap().is_some());

        let restored = TreeSession::new(server, cache, SessionConfig::default());
        assert_eq!(restored.tree(), session.tree());
        assert!(restored.is_expanded(&a));
        assert!(!restored.can_undo());
        assert_eq!(restored.visible_rows().len(), 2);
    }

    #[tokio::test]
    async fn test_expansion_upkeep() {
        let (mut session, _, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("n"), Some(&a)).await.unwrap();

        assert!(!session.toggle_expanded(&a).unwrap());
        assert_eq!(session.visible_rows().len(), 1);
        assert_eq!(session.toggle_expanded(&n), Err(TreeError::NotAFolder(n.clone())));

        session.delete_item(&a).await.unwrap();
        assert_eq!(session.prune_expansion(), 1);
        assert!(session.expansion().is_empty());
    }

    #[tokio::test]
    async fn test_import_replace_all() {
        let (mut session, server, _) = setup();
        session.add_item(ItemDraft::folder("Old"), None).await.unwrap();

        let json = r#"[{"label":"Work","type":"folder","children":[{"label":"Plan","type":"note"}]},
                       {"label":"Home","type":"folder"}]"#;
        assert_eq!(session.import_json(json, ImportMode::ReplaceAll).await, Ok(3));
        assert_eq!(labels_under(&session, None), vec!["Home", "Work"]);
        assert!(session.tree().ids().iter().all(|id| !id.is_transient()));
        assert_eq!(session.tree(), &server.tree().await);
        assert!(!session.can_undo());

        assert_eq!(
            session
                .import_json(r#"{"label":"x","type":"note"}"#, ImportMode::ReplaceAll)
                .await,
            Err(TreeError::RootConstraintViolation)
        );
    }

    #[tokio::test]
    async fn test_import_into_selection() {
        let (mut session, server, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let n = session.add_item(ItemDraft::note("Existing"), Some(&a)).await.unwrap();
        session.select(Some(&n)).unwrap();

        let json = r#"{"label":"Imported","type":"folder","children":[{"label":"Inner","type":"task"}]}"#;
        assert_eq!(session.import_json(json, ImportMode::IntoSelection).await, Ok(2));
        assert_eq!(labels_under(&session, Some(&a)), vec!["Imported", "Existing"]);
        assert_eq!(server.tree().await.item_count(), 4);

        assert_eq!(
            session
                .import_json(r#"{"label":"existing","type":"note"}"#, ImportMode::IntoSelection)
                .await,
            Err(TreeError::NameConflict { label: "existing".into() })
        );
    }

    #[tokio::test]
    async fn test_export() {
        let (mut session, _, _) = setup();
        let a = session.add_item(ItemDraft::folder("A"), None).await.unwrap();
        let all: serde_json::Value = serde_json::from_str(&session.export_json(None).unwrap()).unwrap();
        assert_eq!(all[0]["label"], "A");
        let one: serde_json::Value = serde_json::from_str(&session.export_json(Some(&a)).unwrap()).unwrap();
        assert_eq!(one["type"], "folder");
        assert!(session.export_json(Some(&ItemId::from("zz"))).is_err());
    }
}
