use interactome::graph::{
    simplify, AttributeMap, AttributeValue, CombineRule, EdgeList, InteractionGraph,
};
use interactome::persistence::{self, PersistenceError};
use interactome::sources::{
    build_biogrid_ppi, build_omnipath_ppi, build_string_ppi, BiogridFilter, BiogridInteraction,
    IdentifierMap, OmnipathFilter, OmnipathInteraction, StringLink,
};
use tempfile::TempDir;

fn string_graph() -> InteractionGraph {
    let ids: IdentifierMap = [
        ("p1".to_string(), "TP53".to_string()),
        ("p2".to_string(), "MDM2".to_string()),
        ("p3".to_string(), "CDKN1A".to_string()),
    ]
    .into_iter()
    .collect();
    let link = |a: &str, b: &str, score: u32| StringLink {
        protein1: a.to_string(),
        protein2: b.to_string(),
        combined_score: score,
    };
    build_string_ppi(
        &[link("p1", "p2", 950), link("p2", "p1", 990), link("p1", "p3", 920)],
        &ids,
        900,
    )
}

fn biogrid_graph() -> InteractionGraph {
    let row = |a: &str, b: &str| BiogridInteraction {
        organism_a: 9606,
        organism_b: 9606,
        symbol_a: a.to_string(),
        symbol_b: b.to_string(),
        experimental_system: "Affinity Capture-MS".to_string(),
        experimental_system_type: "physical".to_string(),
    };
    build_biogrid_ppi(
        &[row("TP53", "MDM2"), row("MDM2", "TP53"), row("BRCA1", "BARD1")],
        &BiogridFilter::default(),
    )
}

fn omnipath_graph() -> InteractionGraph {
    let row = |s: &str, t: &str, stimulation: bool| OmnipathInteraction {
        source_genesymbol: s.to_string(),
        target_genesymbol: t.to_string(),
        is_directed: true,
        is_stimulation: stimulation,
        is_inhibition: !stimulation,
    };
    build_omnipath_ppi(
        &[row("EGFR", "GRB2", true), row("GRB2", "EGFR", false), row("PTEN", "AKT1", false)],
        OmnipathFilter::default(),
    )
}

#[test]
fn test_round_trip_every_source() {
    let dir = TempDir::new().unwrap();

    for (name, graph) in [
        ("string", string_graph()),
        ("biogrid", biogrid_graph()),
        ("omnipath", omnipath_graph()),
    ] {
        let path = dir.path().join(format!("{name}.ppig"));
        persistence::save(&graph, &path).unwrap();
        let loaded = persistence::load(&path).unwrap();

        assert_eq!(loaded, graph, "{name}");
        assert_eq!(loaded.is_directed(), graph.is_directed());
        assert_eq!(loaded.attribute_columns(), graph.attribute_columns());
        assert_eq!(
            loaded.vertices().collect::<Vec<_>>(),
            graph.vertices().collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_round_trip_keeps_every_attribute_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.ppig");

    let mut list = EdgeList::new(false);
    let mut attributes = AttributeMap::new();
    attributes.insert("score".to_string(), AttributeValue::Integer(999));
    attributes.insert("weight".to_string(), AttributeValue::Float(-0.42));
    attributes.insert("evidence".to_string(), AttributeValue::Text("Two-hybrid".to_string()));
    list.add_edge("TP53", "MDM2", attributes);
    list.add_vertex("ORPHAN");
    let graph = simplify(list, CombineRule::Max);

    persistence::save(&graph, &path).unwrap();
    let loaded = persistence::load(&path).unwrap();
    assert_eq!(loaded, graph);
    assert!(loaded.contains_vertex("ORPHAN"));

    let edge = loaded.edge("MDM2", "TP53").unwrap();
    assert_eq!(edge.get("weight"), Some(&AttributeValue::Float(-0.42)));
    assert_eq!(edge.get("evidence").and_then(|v| v.as_text()), Some("Two-hybrid"));
}

#[test]
fn test_save_creates_directories_and_overwrites() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graphs").join("2024").join("ppi.ppig");

    persistence::save(&string_graph(), &path).unwrap();
    persistence::save(&biogrid_graph(), &path).unwrap();

    let loaded = persistence::load(&path).unwrap();
    assert_eq!(loaded, biogrid_graph());

    // only the artifact remains, no temporary file
    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_empty_graph_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.ppig");

    let graph = InteractionGraph::new(true);
    persistence::save(&graph, &path).unwrap();
    let loaded = persistence::load(&path).unwrap();
    assert!(loaded.is_empty());
    assert!(loaded.is_directed());
}

#[test]
fn test_corrupted_artifacts_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("string.ppig");
    persistence::save(&string_graph(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    // flipped digest byte
    let mut digest = bytes.clone();
    digest[10] ^= 0xff;
    std::fs::write(&path, &digest).unwrap();
    assert!(matches!(
        persistence::load(&path),
        Err(PersistenceError::ChecksumMismatch)
    ));

    // truncated body
    std::fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();
    assert!(persistence::load(&path).is_err());

    // some other file
    std::fs::write(&path, b"protein1 protein2 combined_score\n").unwrap();
    assert!(matches!(persistence::load(&path), Err(PersistenceError::BadMagic)));
}

#[test]
fn test_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let result = persistence::load(dir.path().join("absent.ppig"));
    assert!(matches!(result, Err(PersistenceError::Io(_))));
}
