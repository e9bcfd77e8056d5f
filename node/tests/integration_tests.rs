//! Integration tests driving the dispatcher end to end:
//! inbound message → command routing → vote engine → LMDB records → replies.
//!
//! The notifier and clock are nullables; storage is a real LMDB environment
//! in a temp dir.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use court_node::{text, BotMetrics, Dispatcher};
use court_nullables::{NullClock, NullNotifier};
use court_store::RecordStore;
use court_store_lmdb::LmdbEnvironment;
use court_types::{ChatId, InboundMessage, MessageId, Roster, Sender, UserId, VoterId};
use court_votes::{VoteEvent, VoteManager};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CHAT: ChatId = ChatId(-1001);

struct Fixture {
    _dir: tempfile::TempDir,
    dispatcher: Dispatcher,
    notifier: Arc<NullNotifier>,
    store: Arc<dyn RecordStore>,
    metrics: Arc<BotMetrics>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open_default(dir.path()).expect("open env");
    let store: Arc<dyn RecordStore> = Arc::new(env.record_store());
    let notifier = Arc::new(NullNotifier::new());
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let metrics = Arc::new(BotMetrics::new());
    let manager =
        VoteManager::new(notifier.clone(), store.clone(), Roster::default()).with_clock(clock);
    let dispatcher = Dispatcher::new(manager, notifier.clone(), store.clone(), metrics.clone());
    Fixture {
        _dir: dir,
        dispatcher,
        notifier,
        store,
        metrics,
    }
}

fn member(voter: i64) -> Sender {
    let username = match voter {
        1 => "Amao62626",
        2 => "maxbillchung",
        _ => "yanglin1112",
    };
    Sender {
        id: VoterId(voter),
        username: Some(username.into()),
        first_name: username.into(),
    }
}

fn message(id: i64, voter: i64, text: &str) -> InboundMessage {
    InboundMessage {
        chat_id: CHAT,
        message_id: MessageId(id),
        sender: member(voter),
        text: text.into(),
        reply_to: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn help_and_rules_reply_with_fixed_text() {
    let mut f = fixture();
    f.dispatcher.handle(&message(1, 1, "/help")).await.unwrap();
    f.dispatcher.handle(&message(2, 1, "/rules@court_bot")).await.unwrap();
    assert_eq!(
        f.notifier.texts(),
        vec![text::HELP_MESSAGE.to_string(), text::RULES_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn nomination_without_target_gets_usage_hint() {
    let mut f = fixture();
    let events = f.dispatcher.handle(&message(1, 1, "/warn")).await.unwrap();
    assert!(events.is_empty());
    assert!(f.dispatcher.manager().active().is_none());
    assert_eq!(f.notifier.last_text().unwrap(), text::usage("warn"));
}

#[tokio::test]
async fn full_vote_persists_and_shows_in_records() {
    let mut f = fixture();

    let events = f
        .dispatcher
        .handle(&message(10, 1, "/vote @maxbillchung"))
        .await
        .unwrap();
    assert!(matches!(events.as_slice(), [VoteEvent::Started { .. }]));
    assert_eq!(f.notifier.deleted(), vec![(CHAT, MessageId(10))]);
    assert_eq!(f.metrics.active_votes.get(), 1);

    let events = f.dispatcher.handle(&message(11, 3, "/agree")).await.unwrap();
    assert!(events.iter().any(|e| matches!(e, VoteEvent::Passed { .. })));
    assert_eq!(f.metrics.active_votes.get(), 0);
    assert_eq!(f.metrics.votes_passed.get(), 1);

    let record = f
        .store
        .get_user_record(&UserId::new("@maxbillchung"))
        .unwrap()
        .unwrap();
    assert_eq!(record.bailan_count, 1);

    f.dispatcher.handle(&message(12, 2, "/records")).await.unwrap();
    assert_eq!(f.notifier.last_text().unwrap(), "澄澄兒 1");

    f.dispatcher
        .handle(&message(13, 2, "/records maxbillchung"))
        .await
        .unwrap();
    assert_eq!(f.notifier.last_text().unwrap(), "澄澄兒 的紀錄:\n1");
}

#[tokio::test]
async fn two_warnings_show_as_one_bailan() {
    let mut f = fixture();
    for round in 0..2 {
        let base = round * 10;
        f.dispatcher
            .handle(&message(base + 1, 1, "/warn @yanglin1112"))
            .await
            .unwrap();
        f.dispatcher.handle(&message(base + 2, 2, "/agree")).await.unwrap();
    }
    assert_eq!(
        f.notifier.last_text().unwrap(),
        "投票結束: 暘暘兒 醜二，白爛 +1"
    );
    let record = f
        .store
        .get_user_record(&UserId::new("@yanglin1112"))
        .unwrap()
        .unwrap();
    assert_eq!((record.bailan_count, record.warning_count), (1, 0));
}

#[tokio::test]
async fn plain_text_is_ignored() {
    let mut f = fixture();
    let events = f.dispatcher.handle(&message(1, 1, "白爛+1")).await.unwrap();
    assert!(events.is_empty());
    assert!(f.notifier.texts().is_empty());
}

#[tokio::test]
async fn reply_with_trigger_starts_vote_without_deleting() {
    let mut f = fixture();
    let mut msg = message(5, 1, "這算不算白爛");
    msg.reply_to = Some(member(2));
    let events = f.dispatcher.handle(&msg).await.unwrap();

    assert!(matches!(events.as_slice(), [VoteEvent::Started { .. }]));
    assert!(f.notifier.deleted().is_empty());
    assert_eq!(
        f.dispatcher.manager().active().unwrap().target_user(),
        &UserId::new("@maxbillchung")
    );
}

#[tokio::test]
async fn command_reply_is_not_a_nomination() {
    let mut f = fixture();
    let mut msg = message(5, 1, "/status 白爛+1");
    msg.reply_to = Some(member(2));
    f.dispatcher.handle(&msg).await.unwrap();
    assert!(f.dispatcher.manager().active().is_none());
    assert_eq!(f.notifier.last_text().unwrap(), "目前沒有進行中的投票");
}

#[tokio::test]
async fn run_drains_channel_until_closed() {
    let f = fixture();
    let (tx, rx) = mpsc::channel(4);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tx.send(message(1, 1, "/status")).await.unwrap();
    tx.send(message(2, 1, "/records @nobody")).await.unwrap();
    drop(tx);

    f.dispatcher.run(rx, shutdown_rx).await;

    assert_eq!(
        f.notifier.texts(),
        vec!["目前沒有進行中的投票".to_string(), "無此用戶".to_string()]
    );
    assert_eq!(f.metrics.handler_errors.get(), 0);
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let f = fixture();
    let (_tx, rx) = mpsc::channel::<InboundMessage>(4);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    shutdown_tx.send(()).unwrap();
    f.dispatcher.run(rx, shutdown_rx).await;
    assert!(f.notifier.texts().is_empty());
}
