//! Whole-action tests rendering what each channel would show.

use crate::in_memory::helpers::{CREATOR, PUSHER, runtime};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::io;
use std::sync::Arc;
use taskboard::{
    board::{
        adapters::{
            memory::{InMemoryTaskRepository, RecordingNotificationSink},
            render::NotificationRenderer,
        },
        domain::{DeliveryKind, MemberId, RolePolicy},
        services::{
            BoardAction, ClaimTaskRequest, CreateTaskRequest, NotificationDelivery,
            ResolveTaskRequest, TaskBoard, TaskLifecycleService,
        },
    },
    config::BoardConfig,
};
use tokio::runtime::Runtime;

type TestBoard = TaskBoard<InMemoryTaskRepository, DefaultClock, RecordingNotificationSink>;

struct Harness {
    board: TestBoard,
    sink: RecordingNotificationSink,
    policy: RolePolicy,
    renderer: NotificationRenderer,
}

impl Harness {
    fn rendered(&self, kind: DeliveryKind) -> Vec<(Option<MemberId>, String)> {
        self.sink
            .delivered()
            .iter()
            .filter(|intent| intent.kind() == kind)
            .map(|intent| {
                let text = self.renderer.render(intent).expect("render");
                (intent.recipient(), text)
            })
            .collect()
    }
}

#[fixture]
fn harness() -> Harness {
    let config = BoardConfig::from_toml_str("").expect("default config");
    let sink = RecordingNotificationSink::new();
    let board = TaskBoard::new(
        TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        ),
        NotificationDelivery::new(Arc::new(sink.clone()), config.delivery.policy()),
    );
    Harness {
        board,
        sink,
        policy: config.roles.policy(),
        renderer: NotificationRenderer::new().expect("renderer"),
    }
}

/// Tests the full lifecycle as seen in each channel.
#[rstest]
fn lifecycle_renders_for_every_audience(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime creation");
    let create = CreateTaskRequest::new(
        "Fix leak",
        CREATOR,
        harness.policy.capabilities_for(["Fuldgyldigt"]),
    )
    .with_price("50kr");

    let task = rt
        .block_on(harness.board.handle(BoardAction::Create(create)))
        .into_outcome()
        .expect("create");
    rt.block_on(harness.board.handle(BoardAction::Claim(ClaimTaskRequest::new(
        task.id(),
        PUSHER,
        harness.policy.capabilities_for(["Pusher"]),
    ))))
    .into_outcome()
    .expect("claim");
    rt.block_on(harness.board.handle(BoardAction::Resolve(
        ResolveTaskRequest::new(task.id(), PUSHER).with_actor_name("Jonas"),
    )))
    .into_outcome()
    .expect("resolve");

    let open_feed = harness.rendered(DeliveryKind::PublicOpenFeedPost);
    assert_eq!(
        open_feed,
        vec![(
            None,
            "📌 Ny opgave\n🧾 Fix leak\n💰 Pris: 50kr\n📝 Oprettet af: <@501>".to_owned()
        )]
    );

    let direct = harness.rendered(DeliveryKind::DirectMessage);
    let [(recipient, notice)] = direct.as_slice() else {
        panic!("expected one direct message, got {direct:?}");
    };
    assert_eq!(*recipient, Some(CREATOR));
    assert!(notice.contains("👤 **Løst af:** Jonas"));

    let replies = harness.rendered(DeliveryKind::EphemeralReply);
    assert_eq!(
        replies,
        vec![
            (Some(CREATOR), "Opgave oprettet.".to_owned()),
            (Some(PUSHER), "Opgave markeret som klaret!".to_owned()),
        ]
    );
}

/// Tests that role names are matched exactly.
#[rstest]
fn lowercase_role_name_does_not_grant_claiming(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime creation");
    let task = rt
        .block_on(harness.board.handle(BoardAction::Create(CreateTaskRequest::new(
            "Fix leak",
            CREATOR,
            harness.policy.capabilities_for(["Ledelse"]),
        ))))
        .into_outcome()
        .expect("create");

    let report = rt.block_on(harness.board.handle(BoardAction::Claim(ClaimTaskRequest::new(
        task.id(),
        PUSHER,
        harness.policy.capabilities_for(["pusher"]),
    ))));

    assert!(report.outcome().is_err());
    let replies = harness.rendered(DeliveryKind::EphemeralReply);
    assert_eq!(
        replies.last(),
        Some(&(
            Some(PUSHER),
            "Du skal være pusher for at tage opgaver!".to_owned()
        ))
    );
}
