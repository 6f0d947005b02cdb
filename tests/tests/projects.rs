
use std::sync::Arc;

use common::*;
use gather::{
    signals::Peek, Client, Criteria, LiveList, MatchAll, MemoryStorageEngine, Project, ProjectTag, Recency, SortOrder, SyncState,
};

fn project(title: &str, likes: i64, judges_pick: bool, tags: &[ProjectTag]) -> Project {
    let mut project = Project::new(title, format!("Team {title}"));
    project.likes = likes;
    project.judges_pick = judges_pick;
    for tag in tags {
        project.toggle_tag(*tag);
    }
    project
}

fn titles(view: &[gather::Record<Project>]) -> Vec<&str> { view.iter().map(|p| p.title.as_str()).collect() }

#[tokio::test]
async fn newer_row_comes_first() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let one = row(&project("one", 0, false, &[]), at(1, 9));
    let two = row(&project("two", 0, false, &[]), at(2, 9));
    engine.seed(table::<Project>(), vec![one.clone(), two.clone()]);

    let list = LiveList::<Project>::new(&Client::new(engine));
    list.start();
    list.wait_ready().await;
    assert_eq!(list.view(MatchAll, Recency).iter().map(|r| r.id).collect::<Vec<_>>(), vec![two.id, one.id]);
    Ok(())
}

#[tokio::test]
async fn equal_timestamps_keep_store_order() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let rows: Vec<_> = ["a", "b", "c", "d"].iter().map(|t| row(&project(t, 0, false, &[]), at(1, 9))).collect();
    engine.seed(table::<Project>(), rows);
    let client = Client::new(engine);

    let store_order: Vec<_> = client.fetch_all::<Project>().await?.iter().map(|r| r.id).collect();
    let list = client.live_list::<Project>();
    list.start();
    list.wait_ready().await;
    for sort in [SortOrder::Recent, SortOrder::MostLiked, SortOrder::JudgesPick] {
        let view = list.view_with(&Criteria::new().sort(sort));
        assert_eq!(view.iter().map(|r| r.id).collect::<Vec<_>>(), store_order, "{sort}");
    }
    Ok(())
}

#[tokio::test]
async fn gallery_sorts_and_follows_remote_edits() -> Result<(), anyhow::Error> {
    let engine = Arc::new(MemoryStorageEngine::new());
    let seeded = vec![
        row(&project("Pathfinder", 12, false, &[ProjectTag::AiMl, ProjectTag::Mobile]), at(1, 9)),
        row(&project("budget buddy", 30, false, &[ProjectTag::FinTech]), at(2, 9)),
        row(&project("Carbon Lens", 12, true, &[ProjectTag::Sustainability, ProjectTag::Web]), at(3, 9)),
    ];
    let pathfinder = seeded[0].id;
    engine.seed(table::<Project>(), seeded);

    let gallery = LiveList::<Project>::new(&Client::new(engine.clone()));
    gallery.start();
    gallery.wait_ready().await;

    assert_eq!(titles(&gallery.view_with(&Criteria::new())), vec!["Carbon Lens", "budget buddy", "Pathfinder"]);
    assert_eq!(titles(&gallery.view_with(&Criteria::new().sort(SortOrder::MostLiked))), vec!["budget buddy", "Carbon Lens", "Pathfinder"]);
    assert_eq!(titles(&gallery.view_with(&Criteria::new().sort(SortOrder::JudgesPick))), vec!["Carbon Lens", "budget buddy", "Pathfinder"]);
    assert_eq!(titles(&gallery.view_with(&Criteria::new().sort(SortOrder::Alphabetical))), vec!["budget buddy", "Carbon Lens", "Pathfinder"]);
    assert_eq!(
        titles(&gallery.view_with(&Criteria::new().facet(ProjectTag::Web).facet(ProjectTag::Mobile))),
        vec!["Carbon Lens", "Pathfinder"]
    );

    // someone likes Pathfinder a lot
    engine.update(&table::<Project>(), pathfinder, serde_json::json!({ "likes": 99 }))?;
    eventually("likes to refresh", || gallery.snapshot().revision() == 2).await;
    assert_eq!(titles(&gallery.view_with(&Criteria::new().sort(SortOrder::MostLiked)))[0], "Pathfinder");

    engine.delete(&table::<Project>(), pathfinder)?;
    eventually("delete to refresh", || gallery.snapshot().revision() == 3).await;
    assert_eq!(gallery.snapshot().len(), 2);
    assert_eq!(gallery.state().peek(), SyncState::Ready);
    Ok(())
}
