// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Notifier behaviour against an in-memory repository and messenger


use std::time::Duration;

use commit_notify::notifier::{MissingMarker, Notifier, NotifyError, NotifyOptions};
use commit_notify::webhook::WebhookError;
use commit_notify_git::GitError;
use fixtures::{FakeRepo, commit, fake_sha};
use similar_asserts::assert_eq;
use test_utils::RecordingMessenger;

fn options() -> NotifyOptions {
    NotifyOptions {
        delay: Duration::ZERO,
        ..Default::default()
    }
}

fn from_start() -> NotifyOptions {
    NotifyOptions {
        missing_marker: MissingMarker::AnnounceAll,
        ..options()
    }
}

fn init_merge_fix() -> FakeRepo {
    FakeRepo::new(vec![
        commit("a", "Init\n"),
        commit("b", "Merge branch x\n"),
        commit("c", "Fix bug\n"),
    ])
}

#[test]
fn test_skips_merge_and_numbers_by_mainline_position() {
    let repo = init_merge_fix();
    let messenger = RecordingMessenger::new();

    let summary = Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect("run should succeed");

    assert_eq!(messenger.sent(), vec!["*0* Init", "*2* Fix bug"]);
    assert_eq!(summary.pending, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.sent, 2);
    assert!(summary.marker_moved);
    assert_eq!(repo.marker(), Some(fake_sha("c")));
    assert_eq!(
        *repo.pushed.borrow(),
        vec![("origin".to_string(), "SlackCommits".to_string())]
    );
}

#[test]
fn test_only_commits_after_marker_are_sent() {
    let repo = init_merge_fix().with_marker_at(&fake_sha("a"));
    let messenger = RecordingMessenger::new();

    let summary = Notifier::new(&repo, &messenger, options())
        .run()
        .expect("run should succeed");

    assert_eq!(messenger.sent(), vec!["*2* Fix bug"]);
    assert_eq!(summary.pending, 2);
}

#[test]
fn test_repeat_run_sends_nothing() {
    let repo = init_merge_fix();
    let messenger = RecordingMessenger::new();

    Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect("first run");
    let second = Notifier::new(&repo, &messenger, options())
        .run()
        .expect("second run");

    assert_eq!(second.pending, 0);
    assert_eq!(second.sent, 0);
    assert_eq!(messenger.attempts(), 2);
    assert_eq!(repo.marker(), Some(fake_sha("c")));
}

#[test]
fn test_marker_at_head_sends_nothing() {
    let repo = init_merge_fix().with_marker_at(&fake_sha("c"));
    let messenger = RecordingMessenger::new();

    let summary = Notifier::new(&repo, &messenger, options())
        .run()
        .expect("run should succeed");

    assert_eq!(summary.pending, 0);
    assert_eq!(messenger.attempts(), 0);
    assert_eq!(repo.marker(), Some(fake_sha("c")));
}

#[test]
fn test_empty_message_is_skipped() {
    let repo = FakeRepo::new(vec![commit("a", "Init"), commit("b", "\n"), commit("c", "")]);
    let messenger = RecordingMessenger::new();

    let summary = Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect("run should succeed");

    assert_eq!(messenger.sent(), vec!["*0* Init"]);
    assert_eq!(summary.skipped, 2);
}

#[test]
fn test_full_message_body_is_sent() {
    let repo = FakeRepo::new(vec![commit("a", "Add chunk LOD\n\n- faster meshing\n- fewer seams\n")]);
    let messenger = RecordingMessenger::new();

    Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect("run should succeed");

    assert_eq!(
        messenger.sent(),
        vec!["*0* Add chunk LOD\n\n- faster meshing\n- fewer seams"]
    );
}

#[test]
fn test_delivery_failure_stops_run_and_keeps_marker() {
    let repo = FakeRepo::new(vec![
        commit("a", "Init"),
        commit("b", "One"),
        commit("c", "Two"),
        commit("d", "Three"),
    ])
    .with_marker_at(&fake_sha("a"));
    let messenger = RecordingMessenger::failing_on(2);

    let err = Notifier::new(&repo, &messenger, options())
        .run()
        .expect_err("second delivery fails");

    match err {
        NotifyError::Delivery { sha, source } => {
            assert_eq!(sha, fake_sha("c"));
            assert!(matches!(source, WebhookError::Status { status: 500, .. }));
        }
        other => panic!("Expected Delivery error, got {other:?}"),
    }
    assert_eq!(messenger.sent(), vec!["*1* One"]);
    assert_eq!(messenger.attempts(), 2);
    assert_eq!(repo.marker(), Some(fake_sha("a")));
    assert!(repo.tagged.borrow().is_empty());
    assert!(repo.pushed.borrow().is_empty());
}

#[test]
fn test_retry_after_failure_resends_from_marker() {
    let repo = FakeRepo::new(vec![commit("a", "Init"), commit("b", "One"), commit("c", "Two")])
        .with_marker_at(&fake_sha("a"));

    let failing = RecordingMessenger::failing_on(2);
    assert!(Notifier::new(&repo, &failing, options()).run().is_err());

    let healthy = RecordingMessenger::new();
    Notifier::new(&repo, &healthy, options())
        .run()
        .expect("retry succeeds");

    assert_eq!(healthy.sent(), vec!["*1* One", "*2* Two"]);
    assert_eq!(repo.marker(), Some(fake_sha("c")));
}

#[test]
fn test_commit_missing_from_mainline_is_lookup_error() {
    let repo = FakeRepo::new(vec![commit("a", "Init"), commit("b", "Side"), commit("c", "Later")])
        .without_mainline(&fake_sha("b"));
    let messenger = RecordingMessenger::new();

    let err = Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect_err("lookup fails");

    match err {
        NotifyError::Lookup { sha, branch } => {
            assert_eq!(sha, fake_sha("b"));
            assert_eq!(branch, "dev");
        }
        other => panic!("Expected Lookup error, got {other:?}"),
    }
    assert_eq!(messenger.sent(), vec!["*0* Init"]);
    assert_eq!(repo.marker(), None);
}

#[test]
fn test_missing_marker_fails_by_default() {
    let repo = init_merge_fix();
    let messenger = RecordingMessenger::new();

    let err = Notifier::new(&repo, &messenger, options())
        .run()
        .expect_err("marker missing");

    assert!(matches!(err, NotifyError::MarkerNotFound { ref marker } if marker == "SlackCommits"));
    assert_eq!(messenger.attempts(), 0);
    assert!(repo.tagged.borrow().is_empty());
}

#[test]
fn test_dry_run_sends_nothing_and_keeps_marker() {
    let repo = init_merge_fix().with_marker_at(&fake_sha("a"));
    let messenger = RecordingMessenger::new();
    let dry_run = NotifyOptions {
        dry_run: true,
        ..options()
    };

    let summary = Notifier::new(&repo, &messenger, dry_run)
        .run()
        .expect("dry run succeeds");

    assert_eq!(summary.announced, 1);
    assert_eq!(summary.sent, 0);
    assert!(!summary.marker_moved);
    assert_eq!(messenger.attempts(), 0);
    assert_eq!(repo.marker(), Some(fake_sha("a")));
}

#[test]
fn test_push_failure_is_reported_after_tagging() {
    let repo = init_merge_fix().with_failing_push();
    let messenger = RecordingMessenger::new();

    let err = Notifier::new(&repo, &messenger, from_start())
        .run()
        .expect_err("push fails");

    assert!(matches!(
        err,
        NotifyError::Git(GitError::Subprocess { code: Some(128), .. })
    ));
    assert_eq!(messenger.sent().len(), 2);
    assert_eq!(repo.tagged.borrow().len(), 1);
}

#[test]
fn test_custom_marker_and_remote_are_used() {
    let repo = init_merge_fix();
    let messenger = RecordingMessenger::new();
    let custom = NotifyOptions {
        remote: "upstream".to_string(),
        ..from_start()
    };

    Notifier::new(&repo, &messenger, custom)
        .run()
        .expect("run should succeed");

    assert_eq!(
        *repo.tagged.borrow(),
        vec![("SlackCommits".to_string(), fake_sha("c"))]
    );
    assert_eq!(
        *repo.pushed.borrow(),
        vec![("upstream".to_string(), "SlackCommits".to_string())]
    );
}

#[test]
fn test_delay_applies_between_deliveries() {
    let repo = FakeRepo::new(vec![commit("a", "One"), commit("b", "Two")]);
    let messenger = RecordingMessenger::new();
    let slow = NotifyOptions {
        delay: Duration::from_millis(20),
        ..from_start()
    };

    let started = std::time::Instant::now();
    Notifier::new(&repo, &messenger, slow)
        .run()
        .expect("run should succeed");

    assert!(started.elapsed() >= Duration::from_millis(40));
}
