//! Club services persisting through the JSON snapshot repository.

use std::sync::Arc;

use bookclub::domain::ports::{
    ClubStateRepository, LifecycleCommand, NewBook, QueueCommand, QueueQuery, RatingCommand,
    RatingQuery, RosterCommand, RosterQuery,
};
use bookclub::domain::{ClubServices, ErrorCode, MemberId, RatingInput, Score};
use bookclub::outbound::{DEFAULT_STATE_FILE, JsonFileClubStateRepository};
use bookclub::test_support::{fixture_clock, temp_state_dir};
use camino::Utf8Path;
use futures::future::join_all;
use rstest::rstest;

fn services_at(dir: &Utf8Path) -> ClubServices<JsonFileClubStateRepository> {
    let repository = JsonFileClubStateRepository::open(dir, DEFAULT_STATE_FILE).expect("open");
    ClubServices::new(Arc::new(repository), fixture_clock())
}

async fn register(services: &ClubServices<JsonFileClubStateRepository>, names: &[&str]) {
    for name in names {
        services
            .roster
            .register_member((*name).to_owned())
            .await
            .expect("register");
    }
}

async fn names_in_turn_order(services: &ClubServices<JsonFileClubStateRepository>) -> Vec<String> {
    let mut names = Vec::new();
    for entry in services.queue.get_queue().await.expect("queue") {
        let member = services.roster.find_member(entry.member).await.expect("member");
        names.push(member.name().to_owned());
    }
    names
}

#[tokio::test]
async fn club_survives_a_restart() {
    let (_guard, dir) = temp_state_dir().expect("temp dir");
    {
        let services = services_at(&dir);
        register(&services, &["Ada", "Bo", "Cy"]).await;
        let book = services
            .roster
            .add_book(NewBook {
                owner: MemberId::new(2),
                title: "The Dispossessed".to_owned(),
                author: "Ursula K. Le Guin".to_owned(),
            })
            .await
            .expect("add book");
        services
            .lifecycle
            .set_next_book(book.id())
            .await
            .expect("set next");
        services
            .lifecycle
            .promote_next_book_if_needed()
            .await
            .expect("promote");
    }

    let services = services_at(&dir);
    assert_eq!(names_in_turn_order(&services).await, ["Bo", "Cy", "Ada"]);
    let current = services
        .roster
        .list_books(Default::default())
        .await
        .expect("books");
    assert_eq!(current.len(), 1);

    let raw = std::fs::read_to_string(dir.join(DEFAULT_STATE_FILE)).expect("snapshot file");
    assert!(raw.ends_with('\n'));
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(json["revision"], 6);
}

#[tokio::test]
async fn concurrent_commands_commit_one_at_a_time() {
    let (_guard, dir) = temp_state_dir().expect("temp dir");
    let services = services_at(&dir);
    register(&services, &["Ada", "Bo", "Cy", "Di", "Eve"]).await;

    let rotations = (0..7).map(|_| services.queue.rotate_queue());
    for result in join_all(rotations).await {
        result.expect("rotation committed");
    }

    assert_eq!(
        names_in_turn_order(&services).await,
        ["Cy", "Di", "Eve", "Ada", "Bo"]
    );
    let repository = JsonFileClubStateRepository::open(&dir, DEFAULT_STATE_FILE).expect("open");
    assert_eq!(repository.load().await.expect("load").revision(), 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separately_opened_stores_never_lose_updates() {
    let (_guard, dir) = temp_state_dir().expect("temp dir");
    let first = services_at(&dir);
    let second = services_at(&dir);
    register(&first, &["Ada", "Bo", "Cy", "Di"]).await;

    let run = |services: ClubServices<JsonFileClubStateRepository>| {
        tokio::spawn(async move {
            let mut outcomes = Vec::new();
            for _ in 0..50 {
                outcomes.push(services.queue.rotate_queue().await.map(|_| ()));
            }
            outcomes
        })
    };
    let (left, right) = tokio::join!(run(first), run(second));
    let outcomes: Vec<_> = left
        .expect("first writer")
        .into_iter()
        .chain(right.expect("second writer"))
        .collect();

    let committed = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert_eq!(err.code(), ErrorCode::Conflict);
        }
    }

    let repository = JsonFileClubStateRepository::open(&dir, DEFAULT_STATE_FILE).expect("open");
    let revision = repository.load().await.expect("load").revision();
    assert_eq!(revision, 4 + u64::try_from(committed).expect("small count"));

    let mut expected = vec!["Ada", "Bo", "Cy", "Di"];
    expected.rotate_left(committed % 4);
    assert_eq!(names_in_turn_order(&services_at(&dir)).await, expected);
}

#[tokio::test]
async fn ratings_persist_with_the_club() {
    let (_guard, dir) = temp_state_dir().expect("temp dir");
    {
        let services = services_at(&dir);
        register(&services, &["Ada", "Bo"]).await;
        let book = services
            .roster
            .add_book(NewBook {
                owner: MemberId::new(1),
                title: "Piranesi".to_owned(),
                author: "Susanna Clarke".to_owned(),
            })
            .await
            .expect("add book");
        let input = RatingInput {
            readability: Score::try_new(5).expect("valid score"),
            content: Score::try_new(4).expect("valid score"),
            comments: Some("A house of endless halls".to_owned()),
        };
        services
            .rating
            .rate_book(book.id(), MemberId::new(2), input)
            .await
            .expect("rate");
    }

    let services = services_at(&dir);
    let ratings = services
        .rating
        .ratings_by_member(MemberId::new(2))
        .await
        .expect("ratings");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings.first().map(|r| r.content.get()), Some(4));
}

#[rstest]
#[case("{\"revision\": ")]
#[case("{\"revision\": 1, \"queue\": [{\"member\": 9, \"position\": 0}]}")]
#[tokio::test]
async fn unreadable_snapshots_surface_as_internal_errors(#[case] contents: &str) {
    let (_guard, dir) = temp_state_dir().expect("temp dir");
    std::fs::write(dir.join(DEFAULT_STATE_FILE), contents).expect("seed snapshot");

    let err = services_at(&dir)
        .queue
        .get_queue()
        .await
        .expect_err("snapshot cannot be used");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
