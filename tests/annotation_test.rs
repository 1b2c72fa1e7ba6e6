use interactome::annotation::{
    annotate, annotate_biogrid, AssociationRow, AssociationTable, DrugTargets, GraphDistance,
    ProximityCategory, ProximitySummary,
};
use interactome::graph::{simplify, AttributeMap, CombineRule, EdgeList, InteractionGraph};
use interactome::persistence;
use interactome::sources::BiogridInteraction;
use std::collections::BTreeSet;
use tempfile::TempDir;

/// MDM2 - TP53 - CDKN1A - CDK2 - CCNE1, plus an unrelated BRCA1 - BARD1 pair
fn p53_graph() -> InteractionGraph {
    let mut list = EdgeList::new(false);
    for (a, b) in [
        ("MDM2", "TP53"),
        ("TP53", "CDKN1A"),
        ("CDKN1A", "CDK2"),
        ("CDK2", "CCNE1"),
        ("BRCA1", "BARD1"),
    ] {
        list.add_edge(a, b, AttributeMap::new());
    }
    simplify(list, CombineRule::None)
}

const ASSOCIATIONS: &str = "\
DRUG_ID,DRUG_NAME,VERSION,GeneSymbol,beta,pval,fdr,target,n_samples
1047,Nutlin-3a,RS,MDM2,-1.2,1e-8,0.001,False,480
1047,Nutlin-3a,RS,TP53,0.9,1e-5,0.02,False,480
1047,Nutlin-3a,RS,CDKN1A,0.4,1e-3,0.08,False,480
1047,Nutlin-3a,RS,CDK2,0.2,0.01,0.3,False,480
1047,Nutlin-3a,RS,CCNE1,0.1,0.2,0.5,False,480
1047,Nutlin-3a,RS,BARD1,0.1,0.3,NA,False,480
1047,Nutlin-3a,RS,NOTAGENE,0.1,0.3,0.9,False,480
2000,Unknown,RS,TP53,0.3,0.01,0.05,False,480
2001,Flagged,RS,EGFR,0.3,0.01,0.05,True,480
";

const TARGETS: &str = "\
DRUG_ID,TARGET
1047,MDM2
2001,EGFR
";

#[test]
fn test_annotate_from_files() {
    let dir = TempDir::new().unwrap();
    let graph_path = dir.path().join("string.ppig");
    let assoc_path = dir.path().join("associations.csv");
    let targets_path = dir.path().join("targets.csv");
    let out_path = dir.path().join("annotated.csv");

    persistence::save(&p53_graph(), &graph_path).unwrap();
    std::fs::write(&assoc_path, ASSOCIATIONS).unwrap();
    std::fs::write(&targets_path, TARGETS).unwrap();

    let graph = persistence::load(&graph_path).unwrap();
    let table = AssociationTable::from_path(&assoc_path).unwrap();
    let targets = DrugTargets::from_path(&targets_path).unwrap();

    let annotations = annotate(table.rows(), &graph, &targets, 3);
    let categories: Vec<String> = annotations.iter().map(|a| a.category.to_string()).collect();
    assert_eq!(categories, vec!["T", "1", "2", "3+", "3+", "-", "-", "-", "T"]);
    assert_eq!(annotations[4].distance, GraphDistance::Hops(4));

    table.write_annotated_path(&out_path, &annotations).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 11);
    assert_eq!(&headers[8], "n_samples");
    assert_eq!(&headers[9], "ppi_distance");
    assert_eq!(&headers[10], "ppi");

    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 9);
    assert_eq!(&records[2][9], "2");
    assert_eq!(&records[5][9], "no-path");
    assert_eq!(&records[5][10], "-");
    assert_eq!(&records[8][10], "T");
}

#[test]
fn test_reannotation_replaces_columns() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.tsv");
    let second = dir.path().join("second.tsv");

    let graph = p53_graph();
    let targets: DrugTargets = [("1047", vec!["MDM2"])].into_iter().collect();
    let table = AssociationTable::from_rows(vec![
        AssociationRow::new("1047", "TP53"),
        AssociationRow::new("1047", "CDK2"),
    ]);

    let annotations = annotate(table.rows(), &graph, &targets, 3);
    table.write_annotated_path(&first, &annotations).unwrap();

    let reread = AssociationTable::from_path(&first).unwrap();
    let again = annotate(reread.rows(), &graph, &targets, 2);
    reread.write_annotated_path(&second, &again).unwrap();

    let content = std::fs::read_to_string(&second).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header.matches("ppi_distance").count(), 1);
    assert!(header.ends_with("ppi_distance\tppi"));
    assert!(content.lines().nth(2).unwrap().ends_with("3\t2+"));
}

#[test]
fn test_distance_properties() {
    let graph = p53_graph();
    let targets: DrugTargets = [("d", vec!["TP53", "CCNE1"])].into_iter().collect();
    let genes: Vec<&str> = graph.vertices().collect();
    let rows: Vec<AssociationRow> = genes.iter().map(|g| AssociationRow::new("d", *g)).collect();

    let annotations = annotate(&rows, &graph, &targets, 10);
    let distance = |gene: &str| {
        let i = genes.iter().position(|g| *g == gene).unwrap();
        annotations[i].distance
    };

    // targets are at zero, everything else is strictly positive or unreachable
    for (gene, annotation) in genes.iter().zip(&annotations) {
        let is_target = targets.is_target("d", gene);
        assert_eq!(annotation.category == ProximityCategory::Target, is_target, "{gene}");
        assert_eq!(annotation.distance == GraphDistance::Hops(0), is_target, "{gene}");
    }

    // neighbors differ by at most one hop
    for edge in graph.edges() {
        match (distance(edge.source).hops(), distance(edge.target).hops()) {
            (Some(a), Some(b)) => assert!(a.abs_diff(b) <= 1, "{} {}", edge.source, edge.target),
            (None, None) => {}
            _ => panic!("edge {}-{} crosses components", edge.source, edge.target),
        }
    }

    // minimum over several targets
    assert_eq!(distance("CDKN1A"), GraphDistance::Hops(1));
    assert_eq!(distance("CDK2"), GraphDistance::Hops(1));
    assert_eq!(distance("BRCA1"), GraphDistance::NoPath);
}

#[test]
fn test_adding_a_target_never_increases_distance() {
    let graph = p53_graph();
    let genes: Vec<&str> = graph.vertices().collect();
    let rows: Vec<AssociationRow> = genes.iter().map(|g| AssociationRow::new("d", *g)).collect();

    let narrow: DrugTargets = [("d", vec!["MDM2"])].into_iter().collect();
    let wide: DrugTargets = [("d", vec!["MDM2", "CDK2"])].into_iter().collect();

    let before = annotate(&rows, &graph, &narrow, 10);
    let after = annotate(&rows, &graph, &wide, 10);
    for (b, a) in before.iter().zip(&after) {
        assert!(a.distance <= b.distance);
    }
}

#[test]
fn test_directed_graph_follows_edge_direction() {
    let mut list = EdgeList::new(true);
    list.add_edge("EGFR", "GRB2", AttributeMap::new());
    list.add_edge("GRB2", "SOS1", AttributeMap::new());
    let graph = simplify(list, CombineRule::Max);

    let targets: DrugTargets = [("erlotinib", vec!["GRB2"])].into_iter().collect();
    let rows = vec![
        AssociationRow::new("erlotinib", "SOS1"),
        AssociationRow::new("erlotinib", "EGFR"),
    ];

    let annotations = annotate(&rows, &graph, &targets, 3);
    assert_eq!(annotations[0].category, ProximityCategory::Hops(1));
    assert_eq!(annotations[1].category, ProximityCategory::NoPath);
}

#[test]
fn test_annotate_biogrid_with_filters() {
    let interaction = |a: &str, b: &str, system: &str, kind: &str| BiogridInteraction {
        organism_a: 9606,
        organism_b: 9606,
        symbol_a: a.to_string(),
        symbol_b: b.to_string(),
        experimental_system: system.to_string(),
        experimental_system_type: kind.to_string(),
    };
    let interactions = vec![
        interaction("MDM2", "TP53", "Affinity Capture-MS", "physical"),
        interaction("TP53", "CDKN1A", "Two-hybrid", "physical"),
        interaction("CDKN1A", "CDK2", "Synthetic Lethality", "genetic"),
    ];
    let targets: DrugTargets = [("1047", vec!["MDM2"])].into_iter().collect();
    let rows = vec![
        AssociationRow::new("1047", "CDKN1A"),
        AssociationRow::new("1047", "CDK2").with_fdr(0.01),
    ];

    let all = annotate_biogrid(&rows, &interactions, &targets, None, None, 5);
    assert_eq!(all[0].category, ProximityCategory::Hops(2));
    assert_eq!(all[1].category, ProximityCategory::Hops(3));

    let physical: BTreeSet<String> = ["physical".to_string()].into_iter().collect();
    let filtered = annotate_biogrid(&rows, &interactions, &targets, None, Some(physical), 5);
    assert_eq!(filtered[0].category, ProximityCategory::Hops(2));
    assert_eq!(filtered[1].category, ProximityCategory::NoPath);

    let summary = ProximitySummary::from_annotations(&rows, &filtered, 0.1);
    assert_eq!(summary.count(ProximityCategory::Hops(2)), 1);
    assert_eq!(summary.significant_count(ProximityCategory::NoPath), 1);
    assert_eq!(summary.significant_count(ProximityCategory::Hops(2)), 0);
}

#[test]
fn test_previous_category_column_does_not_leak_into_distances() {
    // `target` holds categories from an earlier annotation run
    let raw = "\
DRUG_ID,GeneSymbol,fdr,target
1047,MDM2,0.001,T
1047,CDK2,0.02,1
1047,BARD1,0.3,-
";
    let table = AssociationTable::from_reader(raw.as_bytes(), b',').unwrap();
    let targets: DrugTargets = [("1047", vec!["MDM2"])].into_iter().collect();

    let annotations = annotate(table.rows(), &p53_graph(), &targets, 5);
    assert_eq!(annotations[0].category, ProximityCategory::Target);
    assert_eq!(annotations[1].distance, GraphDistance::Hops(3));
    assert_eq!(annotations[1].category, ProximityCategory::Hops(3));
    assert_eq!(annotations[2].category, ProximityCategory::NoPath);
}
