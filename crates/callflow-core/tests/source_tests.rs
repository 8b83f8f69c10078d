use callflow_core::{GraphError, GraphSource, JsonFileSource, RouteGraph};
use std::io::Write;

const SAMPLE: &str = r#"[
    {"id": "did1", "type": "ingress", "label": "Phone Number: (555) 010-0001"},
    {"id": "u100", "type": "user", "label": "Alice"},
    {"id": "e1", "source": "did1", "target": "u100", "priority": 1}
]"#;

#[tokio::test]
async fn test_fetch_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let source = JsonFileSource::new(file.path());
    let elements = source.fetch().await.unwrap();
    assert_eq!(elements.len(), 3);

    let graph = RouteGraph::from_elements(elements).unwrap();
    assert_eq!(graph.ingress_ids(), vec!["did1"]);
}

#[tokio::test]
async fn test_missing_file_is_an_io_error() {
    let source = JsonFileSource::new("/nonexistent/graph.json");
    match source.fetch().await {
        Err(GraphError::Io { path, .. }) => {
            assert_eq!(path, std::path::Path::new("/nonexistent/graph.json"));
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{not json").unwrap();

    let source = JsonFileSource::new(file.path());
    assert!(matches!(source.fetch().await, Err(GraphError::Parse(_))));
}
