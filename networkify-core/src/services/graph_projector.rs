//! 图投影
//!
//! 把账号记录集合投影为渲染用的节点和边。投影是纯函数，
//! 每次调用都从零计算，不保留任何跨调用状态。

use std::collections::HashSet;

use networkify_provider::AccountRef;

use crate::state::account_id_of;
use crate::types::{AccountRecord, Edge, Graph, Node, NodeFill};

/// 图投影器（无状态）
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphProjector;

impl GraphProjector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// 投影记录集合
    ///
    /// - 被排除的记录不产生节点，也不出现在任何边上
    /// - 非账号实体（如 artist）不产生节点或边
    /// - 边按 `"{source}-{target}"` 去重，先写入者为准
    /// - 节点和边的顺序由记录顺序和关系列表顺序决定
    pub fn project(&self, records: &[AccountRecord]) -> Graph {
        let included: Vec<&AccountRecord> = records
            .iter()
            .filter(|r| !r.excluded_from_graph && is_normalized_account(&r.id))
            .collect();

        let mut node_ids: HashSet<&str> = HashSet::with_capacity(included.len());
        let mut nodes = Vec::with_capacity(included.len());
        for record in &included {
            if node_ids.insert(record.id.as_str()) {
                nodes.push(Node {
                    id: record.id.clone(),
                    label: record.display_name.clone(),
                    fill: NodeFill::from(record.crawl_state),
                });
            }
        }

        let mut edge_ids = HashSet::new();
        let mut edges = Vec::new();
        let mut push_edge = |source: &str, target: &str| {
            if !node_ids.contains(source) || !node_ids.contains(target) {
                return;
            }
            let edge = Edge::following(source, target);
            if edge_ids.insert(edge.id.clone()) {
                edges.push(edge);
            }
        };

        for record in &included {
            for follower in related_accounts(&record.followers) {
                push_edge(&follower, &record.id);
            }
            for followee in related_accounts(&record.following) {
                push_edge(&record.id, &followee);
            }
        }

        Graph { nodes, edges }
    }
}

fn is_normalized_account(id: &str) -> bool {
    account_id_of(id).as_deref() == Some(id)
}

/// 关系列表中的账号 ID（已归一化，跳过非账号实体）
fn related_accounts(list: &[AccountRef]) -> impl Iterator<Item = String> + '_ {
    list.iter().filter_map(|r| account_id_of(&r.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CrawlState;

    fn record(id: &str, state: CrawlState) -> AccountRecord {
        let mut r = AccountRecord::new_unsearched(&AccountRef::new(id, id.to_uppercase()));
        r.crawl_state = state;
        r
    }

    #[test]
    fn colors_follow_crawl_state() {
        let records = vec![
            record("a", CrawlState::NotSearched),
            record("b", CrawlState::Searching),
            record("c", CrawlState::Searched),
            record("d", CrawlState::Error),
        ];
        let fills: Vec<_> = GraphProjector::new()
            .project(&records)
            .nodes
            .into_iter()
            .map(|n| n.fill)
            .collect();
        assert_eq!(
            fills,
            vec![NodeFill::Gray, NodeFill::Blue, NodeFill::Green, NodeFill::Red]
        );
    }

    #[test]
    fn reverse_directions_are_distinct_edges() {
        let mut a = record("a", CrawlState::Searched);
        a.following = vec![AccountRef::new("b", "B")];
        a.followers = vec![AccountRef::new("spotify:user:b", "B")];
        let b = record("b", CrawlState::NotSearched);

        let graph = GraphProjector::new().project(&[a, b]);
        let ids: Vec<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b-a", "a-b"]);
    }

    #[test]
    fn same_edge_from_both_endpoints_is_emitted_once() {
        let mut a = record("a", CrawlState::Searched);
        a.following = vec![AccountRef::new("b", "B")];
        let mut b = record("b", CrawlState::Searched);
        b.followers = vec![AccountRef::new("a", "A")];

        let graph = GraphProjector::new().project(&[a, b]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "a");
        assert_eq!(graph.edges[0].target, "b");
    }

    #[test]
    fn edges_to_unknown_accounts_are_dropped() {
        let mut a = record("a", CrawlState::Searched);
        a.following = vec![AccountRef::new("stranger", "S")];
        let graph = GraphProjector::new().project(&[a]);
        assert_eq!(graph.stats().node_count, 1);
        assert_eq!(graph.stats().edge_count, 0);
    }
}
