//! End-to-end tests for the traversal engine: completeness, dedup, BFS
//! ordering, budget enforcement, and budget sharing across concurrent
//! walks.

use std::sync::Arc;

use collection_graph::{Budget, Collection, Edge, Error, Node, StatusMap, Tracker};

fn node(id: &str) -> Node {
    Node::new(id, id)
}

/// A binary tree of the given depth rooted at "n1", ids n1..n(2^depth - 1).
fn binary_tree(depth: u32) -> (Collection, usize) {
    let count = (1 << depth) - 1;
    let mut graph = Collection::new("tree");
    for i in 1..=count {
        graph.add_node(node(&format!("n{i}"))).unwrap();
    }
    for i in 1..=count / 2 {
        graph
            .add_edge(Edge::new(format!("n{i}"), format!("n{}", 2 * i)))
            .unwrap();
        graph
            .add_edge(Edge::new(format!("n{i}"), format!("n{}", 2 * i + 1)))
            .unwrap();
    }
    (graph, count)
}

// ============================================================================
// 2. Traversal completeness & dedup
// ============================================================================

#[test]
fn test_walk_visits_tree_exactly_n_times() {
    let (graph, count) = binary_tree(4);
    let root = graph.root().unwrap().clone();

    let mut visits = 0;
    Tracker::new(&graph)
        .walk(&root, |_| {
            visits += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(visits, count);
}

#[test]
fn test_walk_diamond_visits_shared_node_once() {
    let mut graph = Collection::new("diamond");
    for id in ["root", "left", "right", "shared"] {
        graph.add_node(node(id)).unwrap();
    }
    graph.add_edge(Edge::new("root", "left")).unwrap();
    graph.add_edge(Edge::new("root", "right")).unwrap();
    graph.add_edge(Edge::new("left", "shared")).unwrap();
    graph.add_edge(Edge::new("right", "shared")).unwrap();

    let root = graph.root().unwrap().clone();
    let mut shared_visits = 0;
    Tracker::new(&graph)
        .walk(&root, |n| {
            if n.id == "shared" {
                shared_visits += 1;
            }
            Ok(())
        })
        .unwrap();
    assert_eq!(shared_visits, 1);
}

// ============================================================================
// 3. BFS shortest-path order & reachability
// ============================================================================

#[test]
fn test_bfs_counts_only_reachable_nodes() {
    // node1 -> node4 and node2 -> node4; node2 is unreachable from node1
    let mut graph = Collection::new("partial");
    for id in ["node1", "node2", "node4"] {
        graph.add_node(node(id)).unwrap();
    }
    graph.add_edge(Edge::new("node1", "node4")).unwrap();
    graph.add_edge(Edge::new("node2", "node4")).unwrap();

    let mut visited = Vec::new();
    Tracker::new(&graph)
        .walk_bfs(&node("node1"), |n| {
            visited.push(n.id.clone());
            Ok(())
        })
        .unwrap();

    assert_eq!(visited, ["node1", "node4"]);
}

#[test]
fn test_bfs_level_order() {
    let (graph, _) = binary_tree(3);
    let root = graph.root().unwrap().clone();

    let mut visited = Vec::new();
    Tracker::new(&graph)
        .walk_bfs(&root, |n| {
            visited.push(n.id.trim_start_matches('n').parse::<u32>().unwrap());
            Ok(())
        })
        .unwrap();

    // hop counts are non-decreasing: 1, then {2,3}, then {4..7}
    assert_eq!(visited[0], 1);
    assert!(visited[1..3].iter().all(|&i| (2..=3).contains(&i)));
    assert!(visited[3..].iter().all(|&i| (4..=7).contains(&i)));
}

// ============================================================================
// 4. Budget enforcement
// ============================================================================

#[test]
fn test_zero_budget_fails_before_any_visit() {
    let (graph, _) = binary_tree(2);
    let root = graph.root().unwrap().clone();
    let budget = Budget::new(0);

    let mut visits = 0;
    let err = Tracker::new(&graph)
        .with_budget(&budget)
        .walk(&root, |_| {
            visits += 1;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(visits, 0);
    assert!(matches!(err, Error::BudgetExceeded(_)));
}

#[tokio::test]
async fn test_budget_shared_across_concurrent_walks() {
    // two independent traversals of 7-node trees share one 10-visit cap:
    // together they must get exactly 10 visits before one fails
    let budget = Arc::new(Budget::new(10));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let budget = Arc::clone(&budget);
        handles.push(tokio::task::spawn_blocking(move || {
            let (graph, _) = binary_tree(3);
            let root = graph.root().unwrap().clone();
            let mut visits = 0usize;
            let result = Tracker::new(&graph).with_budget(&budget).walk(&root, |_| {
                visits += 1;
                Ok(())
            });
            (visits, result)
        }));
    }

    let mut total = 0;
    let mut failures = 0;
    for handle in handles {
        let (visits, result) = handle.await.unwrap();
        total += visits;
        if result.is_err() {
            failures += 1;
        }
    }

    assert_eq!(total, 10, "exactly the budgeted visits were granted");
    assert!(failures >= 1, "at least one walk hit the shared cap");
}

// ============================================================================
// Status map: fetch-in-flight dedup
// ============================================================================

#[tokio::test]
async fn test_status_map_single_owner_many_waiters() {
    let status = Arc::new(StatusMap::new());

    let mut owners = 0;
    let mut waiters = Vec::new();
    for _ in 0..5 {
        let (owned, mut rx) = status.try_commit("sha256:shared");
        if owned {
            owners += 1;
        } else {
            waiters.push(tokio::spawn(async move {
                rx.wait_for(|done| *done).await.unwrap();
            }));
        }
    }
    assert_eq!(owners, 1);

    status.complete("sha256:shared");
    for waiter in waiters {
        waiter.await.unwrap();
    }
}
