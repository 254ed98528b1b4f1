//! Turn aggregated groups into populated box sets on the server

use tracing::{error, info};

use super::models::{CollectionGroup, CollectionMap, ErrorRecord, find_by_name};
use crate::error::{SyncError, SyncResult};
use crate::services::MediaServer;

#[derive(Debug, Default)]
pub struct CreationReport {
    pub populated: usize,
    pub failures: Vec<ErrorRecord>,
}

/// Create and fill one box set per eligible group. One group failing never stops the rest.
pub async fn create_collections<S>(server: &S, collections: &CollectionMap) -> CreationReport
where
    S: MediaServer + ?Sized,
{
    let mut report = CreationReport::default();

    for (_, group) in collections.iter() {
        if !group.is_eligible() {
            continue;
        }

        info!("Creating {}", group.raw_name);
        match populate_collection(server, group).await {
            Ok(()) => {
                info!("Added movies to {}", group.raw_name);
                report.populated += 1;
            }
            Err(e) => {
                error!("There was an error sorting: {} - {}", group.raw_name, e);
                report.failures.push(ErrorRecord {
                    name: group.raw_name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

async fn populate_collection<S>(server: &S, group: &CollectionGroup) -> SyncResult<()>
where
    S: MediaServer + ?Sized,
{
    server.create_collection(&group.name).await?;

    // The create call returns no id, so the new box set is found again by its display name.
    let box_sets = server.list_box_sets().await?;
    let target = find_by_name(&box_sets, &group.raw_name)
        .ok_or_else(|| SyncError::BoxSetNotFound(group.raw_name.clone()))?;

    server.add_to_collection(&target.id, &group.ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::models::CollectionRef;
    use crate::sync::testing::{FakeServer, ServerCall};
    use pretty_assertions::assert_eq;

    fn collection(id: i64, name: &str) -> CollectionRef {
        CollectionRef {
            id,
            name: name.to_string(),
        }
    }

    fn add(map: &mut CollectionMap, id: i64, name: &str, members: &[&str]) {
        for member in members {
            map.insert(&collection(id, name), member);
        }
    }

    #[tokio::test]
    async fn test_single_member_groups_are_not_created() {
        let server = FakeServer::default();
        let mut map = CollectionMap::new();
        add(&mut map, 1, "Lonely Collection", &["m1"]);

        let report = create_collections(&server, &map).await;

        assert_eq!(report.populated, 0);
        assert!(report.failures.is_empty());
        assert!(server.calls().is_empty());
    }

    #[tokio::test]
    async fn test_creates_and_fills_collection() {
        let server = FakeServer::default();
        let mut map = CollectionMap::new();
        add(&mut map, 2344, "The Matrix Collection", &["m1", "m2", "m3"]);

        let report = create_collections(&server, &map).await;

        assert_eq!(report.populated, 1);
        assert!(report.failures.is_empty());
        assert_eq!(
            server.calls(),
            vec![
                ServerCall::Create("The%20Matrix%20Collection".to_string()),
                ServerCall::ListBoxSets,
                ServerCall::AddItems(
                    "bs1".to_string(),
                    vec!["m1".to_string(), "m2".to_string(), "m3".to_string()]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_name_mismatch_is_logged_and_next_group_runs() {
        let server = FakeServer::default().renaming("Alien Collection");
        let mut map = CollectionMap::new();
        add(&mut map, 8091, "Alien Collection", &["a1", "a2"]);
        add(&mut map, 9485, "The Fast and the Furious Collection", &["f1", "f2"]);

        let report = create_collections(&server, &map).await;

        assert_eq!(report.populated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "Alien Collection");
        assert!(report.failures[0].reason.contains("Alien Collection"));
        assert_eq!(
            server.created(),
            vec![
                "Alien%20Collection".to_string(),
                "The%20Fast%20and%20the%20Furious%20Collection".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_add_items_failure_is_isolated() {
        let server = FakeServer::default().failing_add("bs1");
        let mut map = CollectionMap::new();
        add(&mut map, 1, "First Collection", &["a", "b"]);
        add(&mut map, 2, "Second Collection", &["c", "d"]);

        let report = create_collections(&server, &map).await;

        assert_eq!(report.populated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "First Collection");
    }
}
