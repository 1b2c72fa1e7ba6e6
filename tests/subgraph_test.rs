use interactome::graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, InteractionGraph, WEIGHT,
};
use interactome::persistence;
use interactome::subgraph::{
    extract_ego_subgraph, CorrelationWeights, EgoQuery, EgoStatus, GeneProfiles,
};
use tempfile::TempDir;

/// KRAS - RAF1 - MAP2K1 - MAPK1 - ELK1, KRAS - PIK3CA - AKT1, KRAS - NRAS
fn mapk_graph() -> InteractionGraph {
    let mut list = EdgeList::new(false);
    for (a, b) in [
        ("KRAS", "RAF1"),
        ("RAF1", "MAP2K1"),
        ("MAP2K1", "MAPK1"),
        ("MAPK1", "ELK1"),
        ("KRAS", "PIK3CA"),
        ("PIK3CA", "AKT1"),
        ("KRAS", "NRAS"),
    ] {
        list.add_edge(a, b, AttributeMap::new());
    }
    simplify(list, CombineRule::None)
}

// KRAS/RAF1/ELK1/PIK3CA rise, MAP2K1/MAPK1 fall, NRAS is uncorrelated,
// AKT1 has a single measurement
const PROFILES: &str = "\
gene\ts1\ts2\ts3\ts4\ts5
KRAS\t1\t2\t3\t4\t5
RAF1\t1\t2\t3\t4\t5
MAP2K1\t5\t4\t3\t2\t1
MAPK1\t5\t4\t3\t2\t1
ELK1\t1\t2\t3\t4\t5
PIK3CA\t1\t2\t3\t4\t5
AKT1\tNA\tNA\t3\tNA\tNA
NRAS\t2\t1\t3\t1\t2
";

fn profile_weights(dir: &TempDir, graph: &InteractionGraph) -> CorrelationWeights {
    let path = dir.path().join("expression.tsv");
    std::fs::write(&path, PROFILES).unwrap();
    let profiles = GeneProfiles::from_path(&path).unwrap();
    assert_eq!(profiles.gene_count(), 8);
    CorrelationWeights::from_profiles(&profiles, graph)
}

#[test]
fn test_ego_from_profiles() {
    let dir = TempDir::new().unwrap();
    let graph = mapk_graph();
    let weights = profile_weights(&dir, &graph);

    assert!((weights.get("KRAS", "RAF1").unwrap() - 1.0).abs() < 1e-9);
    assert!((weights.get("MAP2K1", "RAF1").unwrap() + 1.0).abs() < 1e-9);
    assert!(weights.get("KRAS", "NRAS").unwrap().abs() < 1e-9);
    assert_eq!(weights.get("PIK3CA", "AKT1"), None);

    let query = EgoQuery::new("KRAS").hops(2).weight_threshold(0.3);
    let ego = extract_ego_subgraph(&graph, &weights, &query);

    assert_eq!(ego.status, EgoStatus::Extracted);
    let symbols: Vec<&str> = ego.vertices.iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["KRAS", "PIK3CA", "RAF1", "MAP2K1"]);
    assert_eq!(ego.edge_count(), 3);
    assert!(ego.edges.iter().all(|e| e.weight.abs() >= 0.3));
    assert!(ego.vertices.iter().all(|v| v.hops <= 2));
}

#[test]
fn test_hop_bound_is_respected() {
    let dir = TempDir::new().unwrap();
    let graph = mapk_graph();
    let weights = profile_weights(&dir, &graph);

    for hops in 0..5 {
        let query = EgoQuery::new("KRAS").hops(hops).keep_isolated(true);
        let ego = extract_ego_subgraph(&graph, &weights, &query);
        assert!(ego.vertices.iter().all(|v| v.hops <= hops), "hops = {hops}");
        for edge in &ego.edges {
            assert!(ego.contains_vertex(&edge.source));
            assert!(ego.contains_vertex(&edge.target));
        }
    }

    let query = EgoQuery::new("KRAS").hops(4).keep_isolated(true);
    let whole = extract_ego_subgraph(&graph, &weights, &query);
    assert_eq!(whole.vertex_count(), graph.vertex_count());
    assert_eq!(whole.hops_of("ELK1"), Some(4));
}

#[test]
fn test_keep_isolated_retains_dropped_neighbors() {
    let dir = TempDir::new().unwrap();
    let graph = mapk_graph();
    let weights = profile_weights(&dir, &graph);

    let query = EgoQuery::new("KRAS").hops(2).weight_threshold(0.3).keep_isolated(true);
    let ego = extract_ego_subgraph(&graph, &weights, &query);
    assert!(ego.contains_vertex("NRAS"));
    assert!(ego.contains_vertex("AKT1"));
    assert_eq!(ego.edge_count(), 3);
}

#[test]
fn test_excluded_genes_cut_expansion() {
    let dir = TempDir::new().unwrap();
    let graph = mapk_graph();
    let weights = profile_weights(&dir, &graph);

    let query = EgoQuery::new("KRAS").hops(4).exclude(["RAF1"]).keep_isolated(true);
    let ego = extract_ego_subgraph(&graph, &weights, &query);

    for gene in ["RAF1", "MAP2K1", "MAPK1", "ELK1"] {
        assert!(!ego.contains_vertex(gene), "{gene}");
    }
    assert!(ego.edges.iter().all(|e| e.source != "RAF1" && e.target != "RAF1"));
    assert!(ego.contains_vertex("PIK3CA"));
}

#[test]
fn test_missing_or_excluded_seed() {
    let graph = mapk_graph();
    let weights = CorrelationWeights::new();

    let missing = extract_ego_subgraph(&graph, &weights, &EgoQuery::new("BRAF"));
    assert_eq!(missing.status, EgoStatus::SeedNotInGraph);
    assert!(missing.is_empty());

    let excluded = extract_ego_subgraph(&graph, &weights, &EgoQuery::new("KRAS").exclude(["KRAS"]));
    assert_eq!(excluded.status, EgoStatus::SeedExcluded);
    assert!(excluded.is_empty());
}

#[test]
fn test_weights_file_and_artifacts() {
    let dir = TempDir::new().unwrap();
    let weights_path = dir.path().join("weights.csv");
    std::fs::write(
        &weights_path,
        "source,target,weight\nRAF1,KRAS,0.8\nKRAS,PIK3CA,-0.6\nKRAS,NRAS,0.1\n",
    )
    .unwrap();

    let graph = mapk_graph();
    let weights = CorrelationWeights::from_path(&weights_path).unwrap();
    assert_eq!(weights.len(), 3);

    let ego = extract_ego_subgraph(&graph, &weights, &EgoQuery::new("KRAS").weight_threshold(0.5));
    assert_eq!(ego.edge_count(), 2);

    // rendered as JSON
    let json: serde_json::Value = serde_json::from_str(&ego.to_json().unwrap()).unwrap();
    assert_eq!(json["status"], "extracted");
    assert_eq!(json["vertices"][0]["symbol"], "KRAS");
    assert_eq!(json["edges"].as_array().unwrap().len(), 2);

    // and as a persisted graph carrying the weights
    let artifact = dir.path().join("kras.ppig");
    persistence::save(&ego.to_graph(), &artifact).unwrap();
    let loaded = persistence::load(&artifact).unwrap();
    assert_eq!(loaded.edge_count(), 2);
    assert_eq!(
        loaded.edge("PIK3CA", "KRAS").and_then(|a| a.get(WEIGHT)),
        Some(&AttributeValue::Float(-0.6))
    );
}

#[test]
fn test_missing_weight_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weights.csv");
    std::fs::write(&path, "source,target,r\nKRAS,RAF1,0.8\n").unwrap();
    assert!(CorrelationWeights::from_path(&path).is_err());
}
