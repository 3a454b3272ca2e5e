use std::{mem, sync::Arc, time::Duration};

use parking_lot::Mutex;
use shortkey_engine::{
    ActionId, BindingTable, Dispatcher, Disposition, Handle, KeyEvent, KeySource, Options, Target,
    Trigger, configure,
};
use tokio::time::sleep;

/// Collects fired actions in order.
#[derive(Clone, Default)]
struct Recorder {
    fired: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn handler(&self) -> impl Fn(&ActionId) + Send + Sync + 'static {
        let fired = self.fired.clone();
        move |a: &ActionId| fired.lock().push(a.to_string())
    }

    fn take(&self) -> Vec<String> {
        mem::take(&mut *self.fired.lock())
    }
}

fn admin_table() -> BindingTable {
    BindingTable::new([
        ("cmd+k", "palette.open"),
        ("cmd+shift+p", "palette.commands"),
        ("shift+n", "item.new"),
        ("?", "help"),
        ("n b", "notifications"),
        ("g d", "nav.dashboard"),
        ("g o", "nav.orders"),
    ])
}

fn attach(source: &KeySource, table: BindingTable) -> (Handle, Recorder) {
    let rec = Recorder::default();
    let handle = configure(source, table, rec.handler(), Options::default()).expect("configure");
    (handle, rec)
}

fn key(k: &str) -> KeyEvent {
    KeyEvent::new(k)
}

#[tokio::test(start_paused = true)]
async fn each_chord_fires_exactly_its_action() {
    let source = KeySource::new();
    let (_handle, rec) = attach(&source, admin_table());

    let cases = [
        (key("k").with_meta(), "palette.open"),
        (key("k").with_ctrl(), "palette.open"),
        (key("P").with_meta().with_shift(), "palette.commands"),
        (key("N").with_shift(), "item.new"),
        (key("?"), "help"),
    ];
    for (ev, want) in cases {
        let d = source.emit(&ev);
        assert!(d.handled(), "{:?} should be handled", ev);
        assert_eq!(rec.take(), vec![want.to_string()]);
    }
}

#[tokio::test(start_paused = true)]
async fn unmatched_keys_pass_through() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    assert_eq!(source.emit(&key("k")), Disposition::Unmatched);
    assert_eq!(source.emit(&key("k").with_shift()), Disposition::Unmatched);
    assert_eq!(source.emit(&key("z").with_meta()), Disposition::Unmatched);
    assert!(rec.take().is_empty());
    assert_eq!(handle.pending_key(), None);
}

#[tokio::test(start_paused = true)]
async fn sequence_within_window_fires_once() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    let first = source.emit(&key("g"));
    assert_eq!(first, Disposition::Pending { first: "g".into() });
    assert!(!first.handled());
    assert_eq!(handle.pending_key().as_deref(), Some("g"));

    sleep(Duration::from_millis(700)).await;
    let second = source.emit(&key("d"));
    assert_eq!(
        second,
        Disposition::Fired {
            action: ActionId::from("nav.dashboard"),
            trigger: Trigger::Sequence,
        }
    );
    assert!(second.handled());
    assert_eq!(rec.take(), vec!["nav.dashboard".to_string()]);
    assert_eq!(handle.pending_key(), None);

    // The sequence does not repeat on its own.
    assert_eq!(source.emit(&key("d")), Disposition::Unmatched);
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sequence_after_timeout_fires_nothing() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    sleep(Duration::from_millis(900)).await;
    assert_eq!(handle.pending_key(), None);
    assert_eq!(source.emit(&key("d")), Disposition::Unmatched);
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_is_honoured() {
    let source = KeySource::new();
    let rec = Recorder::default();
    let options = Options {
        sequence_timeout: Duration::from_millis(200),
    };
    let _handle = configure(&source, admin_table(), rec.handler(), options).expect("configure");

    source.emit(&key("g"));
    sleep(Duration::from_millis(300)).await;
    source.emit(&key("d"));
    assert!(rec.take().is_empty());

    source.emit(&key("g"));
    sleep(Duration::from_millis(150)).await;
    source.emit(&key("d"));
    assert_eq!(rec.take(), vec!["nav.dashboard".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn shifted_chord_and_bare_prefix_are_distinct() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    let d = source.emit(&key("n").with_shift());
    assert_eq!(d.action(), Some(&ActionId::from("item.new")));
    assert_eq!(handle.pending_key(), None);
    assert_eq!(rec.take(), vec!["item.new".to_string()]);

    assert_eq!(
        source.emit(&key("n")),
        Disposition::Pending { first: "n".into() }
    );
    assert!(rec.take().is_empty());
    source.emit(&key("b"));
    assert_eq!(rec.take(), vec!["notifications".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn editable_targets_never_fire() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    for target in [Target::TextField, Target::TextArea, Target::ContentEditable] {
        for ev in [key("k").with_meta(), key("?"), key("g"), key("n").with_shift()] {
            let ev = ev.with_target(target);
            assert_eq!(source.emit(&ev), Disposition::Suppressed);
        }
    }
    assert!(rec.take().is_empty());
    assert_eq!(handle.pending_key(), None);
}

#[tokio::test(start_paused = true)]
async fn editable_target_does_not_disturb_pending_sequence() {
    let source = KeySource::new();
    let (_handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    source.emit(&key("x").with_target(Target::TextField));
    source.emit(&key("d"));
    assert_eq!(rec.take(), vec!["nav.dashboard".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn abandoned_prefix_does_not_persist() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    source.emit(&key("d"));
    assert_eq!(rec.take(), vec!["nav.dashboard".to_string()]);

    source.emit(&key("g"));
    assert_eq!(source.emit(&key("x")), Disposition::Unmatched);
    assert_eq!(handle.pending_key(), None);
    assert_eq!(source.emit(&key("d")), Disposition::Unmatched);
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn modifier_keydown_abandons_pending_sequence() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    assert_eq!(source.emit(&key("Alt")), Disposition::Unmatched);
    assert_eq!(handle.pending_key(), None);
    source.emit(&key("o"));

    source.emit(&key("g"));
    source.emit(&key("Shift").with_shift());
    assert_eq!(handle.pending_key(), None);
    source.emit(&key("d"));
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn modifier_key_binding_fires() {
    let source = KeySource::new();
    let (_handle, rec) = attach(
        &source,
        BindingTable::new([("alt", "menu"), ("g d", "nav.dashboard")]),
    );

    let d = source.emit(&key("Alt"));
    assert_eq!(
        d,
        Disposition::Fired {
            action: ActionId::from("menu"),
            trigger: Trigger::Key,
        }
    );
    assert_eq!(rec.take(), vec!["menu".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn chord_during_pending_sequence_wins() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    let d = source.emit(&key("k").with_meta());
    assert_eq!(d.action(), Some(&ActionId::from("palette.open")));
    assert_eq!(handle.pending_key(), None);
    source.emit(&key("d"));
    assert_eq!(rec.take(), vec!["palette.open".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn stale_deadline_does_not_clear_newer_sequence() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    // First "g" would expire at 800ms.
    source.emit(&key("g"));
    sleep(Duration::from_millis(500)).await;
    source.emit(&key("x"));
    // Second "g" expires at 1300ms.
    source.emit(&key("g"));
    sleep(Duration::from_millis(400)).await;
    assert_eq!(handle.pending_key().as_deref(), Some("g"));
    source.emit(&key("o"));
    assert_eq!(rec.take(), vec!["nav.orders".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn rebind_replaces_bindings_immediately() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    handle.rebind(BindingTable::new([("cmd+j", "jump"), ("g h", "nav.home")]));
    assert_eq!(handle.pending_key(), None);

    assert_eq!(source.emit(&key("k").with_meta()), Disposition::Unmatched);
    source.emit(&key("g"));
    assert_eq!(source.emit(&key("d")), Disposition::Unmatched);
    source.emit(&key("j").with_meta());
    source.emit(&key("g"));
    source.emit(&key("h"));
    assert_eq!(
        rec.take(),
        vec!["jump".to_string(), "nav.home".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn configure_again_replaces_listener() {
    let source = KeySource::new();
    let (old, old_rec) = attach(&source, admin_table());
    source.emit(&key("g"));

    let (new, new_rec) = attach(&source, BindingTable::new([("g d", "other")]));
    assert!(!old.is_active());
    assert!(new.is_active());

    // The old dispatcher's pending "g" is gone; the new one starts idle.
    source.emit(&key("d"));
    assert!(old_rec.take().is_empty());
    assert!(new_rec.take().is_empty());

    // Dropping the stale handle leaves the new listener attached.
    drop(old);
    assert!(source.is_attached());
    source.emit(&key("g"));
    source.emit(&key("d"));
    assert_eq!(new_rec.take(), vec!["other".to_string()]);
    assert!(old_rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn nothing_fires_after_dispose() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());

    source.emit(&key("g"));
    handle.dispose();
    assert!(!source.is_attached());

    assert_eq!(source.emit(&key("d")), Disposition::Unmatched);
    assert_eq!(source.emit(&key("k").with_meta()), Disposition::Unmatched);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(source.emit(&key("?")), Disposition::Unmatched);
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn detached_dispatcher_reports_editable_events_unmatched() {
    let rec = Recorder::default();
    let dispatcher = Dispatcher::new(admin_table(), rec.handler(), Options::default())
        .expect("dispatcher");
    let typed = key("k").with_meta().with_target(Target::TextField);

    assert_eq!(dispatcher.dispatch(&typed), Disposition::Suppressed);
    dispatcher.detach();
    assert_eq!(dispatcher.dispatch(&typed), Disposition::Unmatched);
    assert_eq!(dispatcher.dispatch(&key("?")), Disposition::Unmatched);
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_detaches() {
    let source = KeySource::new();
    let (handle, rec) = attach(&source, admin_table());
    drop(handle);
    assert!(!source.is_attached());
    source.emit(&key("?"));
    assert!(rec.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn handler_may_rebind_from_inside_action() {
    let source = KeySource::new();
    let slot: Arc<Mutex<Option<Handle>>> = Arc::new(Mutex::new(None));
    let fired = Arc::new(Mutex::new(Vec::new()));

    let slot_in = slot.clone();
    let fired_in = fired.clone();
    let handler = move |a: &ActionId| {
        fired_in.lock().push(a.to_string());
        if a.as_str() == "mode.vim"
            && let Some(h) = slot_in.lock().as_ref()
        {
            h.rebind(BindingTable::new([("j", "down")]));
        }
    };
    let handle = configure(
        &source,
        BindingTable::new([("cmd+v", "mode.vim")]),
        handler,
        Options::default(),
    )
    .expect("configure");
    *slot.lock() = Some(handle);

    source.emit(&key("v").with_meta());
    source.emit(&key("j"));
    assert_eq!(
        *fired.lock(),
        vec!["mode.vim".to_string(), "down".to_string()]
    );
    slot.lock().take();
    assert!(!source.is_attached());
}
