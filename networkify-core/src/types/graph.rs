//! 渲染用图结构

use serde::{Deserialize, Serialize};

use super::CrawlState;

/// 边的标签（所有边都表示“关注”）
pub const FOLLOWING_LABEL: &str = "Following";

/// 节点颜色，对应抓取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeFill {
    Gray,
    Blue,
    Green,
    Red,
}

impl From<CrawlState> for NodeFill {
    fn from(state: CrawlState) -> Self {
        match state {
            CrawlState::NotSearched => Self::Gray,
            CrawlState::Searching => Self::Blue,
            CrawlState::Searched => Self::Green,
            CrawlState::Error => Self::Red,
        }
    }
}

/// 图节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub fill: NodeFill,
}

/// 有向边：`source` 关注 `target`
///
/// `id` 为 `"{source}-{target}"`，正反两个方向是不同的边
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

impl Edge {
    pub fn following(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            label: FOLLOWING_LABEL.to_string(),
        }
    }
}

/// 投影结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// 图规模统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Graph {
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
