
use std::sync::Arc;

use common::*;
use gather::{signals::Peek, Client, Criteria, FacetFilter, LiveList, MemoryStorageEngine, NoticeKind, Participant, RoleGroup, SortOrder, SyncState};

fn roster() -> Vec<(Participant, u32)> {
    vec![
        (Participant::new("Ada", "ada@example.com", "Software Engineer").with_skills("Rust, Postgres"), 1),
        (Participant::new("Grace", "grace@example.com", "UI/UX Designer").with_skills("Figma, CSS"), 2),
        (Participant::new("Kai", "kai@example.com", "AI Engineer").with_skills("PyTorch, Rust"), 3),
        (Participant::new("Ren", "ren@example.com", "Product Manager").with_skills("Roadmaps"), 4),
        (Participant::new("Noor", "noor@example.com", "Data Scientist").with_skills("SQL"), 5),
    ]
}

async fn setup() -> (Arc<MemoryStorageEngine>, Client, Arc<RecordingNotifier>, LiveList<Participant>) {
    let engine = Arc::new(MemoryStorageEngine::new());
    engine.seed(table::<Participant>(), roster().iter().map(|(p, day)| row(p, at(*day, 9))));
    let notifier = RecordingNotifier::new();
    let client = Client::builder(engine.clone(), engine.clone()).notifier(notifier.clone()).build();
    let list = LiveList::<Participant>::new(&client);
    list.start();
    list.wait_ready().await;
    (engine, client, notifier, list)
}

fn names(view: &[gather::Record<Participant>]) -> Vec<&str> { view.iter().map(|p| p.name.as_str()).collect() }

#[tokio::test]
async fn search_and_role_filters() -> Result<(), anyhow::Error> {
    let (_engine, _client, _notifier, list) = setup().await;

    assert_eq!(names(&list.view_with(&Criteria::new())), vec!["Noor", "Ren", "Kai", "Grace", "Ada"]);
    assert_eq!(names(&list.view_with(&Criteria::new().search("RUST"))), vec!["Kai", "Ada"]);
    assert_eq!(names(&list.view_with(&Criteria::new().facet(RoleGroup::Engineers))), vec!["Kai", "Ada"]);
    assert_eq!(names(&list.view_with(&Criteria::new().facet(RoleGroup::AiData))), vec!["Noor", "Kai"]);
    assert_eq!(names(&list.view_with(&Criteria::new().facet(RoleGroup::PmBa))), vec!["Ren"]);
    assert_eq!(names(&list.view_with(&Criteria::new().search("engineer").facet(RoleGroup::AiData))), vec!["Kai"]);
    assert_eq!(names(&list.view_with(&Criteria::new().sort(SortOrder::Alphabetical))), vec!["Ada", "Grace", "Kai", "Noor", "Ren"]);
    Ok(())
}

#[tokio::test]
async fn adding_criteria_only_narrows() -> Result<(), anyhow::Error> {
    let (_engine, _client, _notifier, list) = setup().await;
    let queries = ["", "a", "rust", "engineer", "zzz"];
    let facets = [FacetFilter::all(), FacetFilter::only(RoleGroup::Engineers), FacetFilter::any_of([RoleGroup::Designers, RoleGroup::AiData])];

    for query in queries {
        let wide = list.view_with(&Criteria::new().search(query));
        for facet in facets.iter() {
            let narrow = list.view_with(&Criteria::new().search(query).facets(facet.clone()));
            assert!(narrow.iter().all(|r| wide.contains(r)), "{query:?} with {facet:?} escaped the search-only view");
        }
    }
    Ok(())
}

#[tokio::test]
async fn registration_appears_live_and_is_announced_once() -> Result<(), anyhow::Error> {
    let (_engine, client, notifier, list) = setup().await;

    let registered = client
        .submit(Participant::new("Lin", "lin@example.com", "Software Engineer").with_skills("Go"), "Registration Successful!")
        .await?;
    eventually("new participant", || list.snapshot().len() == 6).await;
    assert_eq!(list.view_with(&Criteria::new())[0].id, registered.id);

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);

    // a failed write is reported but leaves the synchronizer alone
    assert!(client.submit(Participant::new("", "bad", ""), "Registration Successful!").await.is_err());
    assert_eq!(notifier.take().iter().map(|n| n.kind).collect::<Vec<_>>(), vec![NoticeKind::Error]);
    assert_eq!(list.state().peek(), SyncState::Ready);
    assert_eq!(list.snapshot().len(), 6);
    Ok(())
}
